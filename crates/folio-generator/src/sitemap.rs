//! Sitemap generation.
//!
//! A fixed-schema XML sitemap: home, about, the tag index, every tag and
//! every document with its last-modified date.

use std::io::Write;

use chrono::NaiveDate;
use folio_core::{Config, Document};
use thiserror::Error;
use tracing::debug;

use crate::collector::TagIndex;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// Absolute URL.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<NaiveDate>,

    pub changefreq: ChangeFreq,

    /// Priority (0.0 to 1.0).
    pub priority: f32,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator<'a> {
    config: &'a Config,
}

impl<'a> SitemapGenerator<'a> {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Entries in output order.
    pub fn urls(
        &self,
        documents: &[Document],
        tags: &TagIndex<'_>,
        has_about: bool,
    ) -> Vec<SitemapUrl> {
        let mut urls = vec![self.url("/", None, ChangeFreq::Daily, 1.0)];

        if has_about {
            urls.push(self.url("/about/", None, ChangeFreq::Monthly, 0.5));
        }

        urls.extend(
            documents
                .iter()
                .map(|doc| self.url(&doc.url, Some(doc.date), ChangeFreq::Weekly, 0.8)),
        );

        urls.push(self.url("/tags/", None, ChangeFreq::Weekly, 0.6));
        urls.extend(
            tags.sorted_by_name()
                .into_iter()
                .map(|entry| self.url(&entry.url(), None, ChangeFreq::Weekly, 0.6)),
        );

        urls
    }

    /// Generate sitemap XML.
    pub fn generate(&self, documents: &[Document], tags: &TagIndex<'_>, has_about: bool) -> String {
        let urls = self.urls(documents, tags, has_about);
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for url in &urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(
        &self,
        documents: &[Document],
        tags: &TagIndex<'_>,
        has_about: bool,
        writer: &mut W,
    ) -> Result<()> {
        let xml = self.generate(documents, tags, has_about);
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn url(
        &self,
        path: &str,
        lastmod: Option<NaiveDate>,
        changefreq: ChangeFreq,
        priority: f32,
    ) -> SitemapUrl {
        SitemapUrl {
            loc: self.config.url_for(path),
            lastmod,
            changefreq,
            priority,
        }
    }
}

fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));

    if let Some(lastmod) = &url.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }

    xml.push_str(&format!(
        "    <changefreq>{}</changefreq>\n",
        url.changefreq.as_str()
    ));
    xml.push_str(&format!("    <priority>{:.1}</priority>\n", url.priority));

    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, path::PathBuf};

    use super::*;
    use crate::collector::extract_tag_index;

    fn test_config() -> Config {
        Config::new("Test Site", "https://example.com/")
    }

    fn doc(id: &str, date: &str, tags: &[&str]) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
            formatted_date: String::new(),
            author: "Anonymous".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: None,
            draft: false,
            raw_body: String::new(),
            rendered_body: String::new(),
            reading_time_minutes: 1,
            url: Document::url_for_id(id),
            extra: BTreeMap::new(),
            source_path: PathBuf::from(format!("{id}.md")),
        }
    }

    #[test]
    fn test_generate_sitemap() {
        let config = test_config();
        let documents = vec![
            doc("second", "2024-02-01", &["Rust"]),
            doc("first", "2024-01-15", &[]),
        ];
        let tags = extract_tag_index(&documents);
        let xml = SitemapGenerator::new(&config).generate(&documents, &tags, true);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/about/</loc>"));
        assert!(xml.contains("<loc>https://example.com/posts/second/</loc>"));
        assert!(xml.contains("<lastmod>2024-02-01</lastmod>"));
        assert!(xml.contains("<lastmod>2024-01-15</lastmod>"));
        assert!(xml.contains("<loc>https://example.com/tags/</loc>"));
        assert!(xml.contains("<loc>https://example.com/tags/rust/</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_about_is_optional() {
        let config = test_config();
        let tags = extract_tag_index(&[]);
        let generator = SitemapGenerator::new(&config);

        let urls = generator.urls(&[], &tags, false);
        let locs: Vec<_> = urls.iter().map(|u| u.loc.as_str()).collect();
        assert_eq!(locs, vec!["https://example.com/", "https://example.com/tags/"]);
        assert_eq!(urls[0].changefreq, ChangeFreq::Daily);
    }

    #[test]
    fn test_write_to() {
        let config = test_config();
        let tags = extract_tag_index(&[]);
        let mut out = Vec::new();
        SitemapGenerator::new(&config)
            .write_to(&[], &tags, false, &mut out)
            .expect("write");
        assert!(String::from_utf8(out).expect("utf8").contains("<urlset"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
        assert_eq!(escape_xml(r#""'"#), "&quot;&apos;");
    }
}
