//! Document types and derived fields.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Locale, NaiveDate, Utc};

use crate::slug::slugify;

/// Where a document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    /// Identifier derived from the file name.
    pub id: String,

    /// Source file path.
    pub path: PathBuf,

    /// File modification time, used when no date is given.
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentSource {
    /// Derive a source descriptor from a file path.
    ///
    /// Returns `None` when the file stem does not produce a usable id.
    pub fn from_path(path: &Path, modified: Option<DateTime<Utc>>) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let id = slugify(stem);
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id,
            path: path.to_path_buf(),
            modified,
        })
    }

    /// Identifier used in log lines and error messages.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }
}

/// A fully processed post. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Unique id derived from the file name.
    pub id: String,

    /// Title, synthesized from the id when missing.
    pub title: String,

    /// Publication date, synthesized from the modification time when missing.
    pub date: NaiveDate,

    /// Locale-formatted publication date.
    pub formatted_date: String,

    /// Author, falls back to the configured default.
    pub author: String,

    /// Ordered, de-duplicated tags.
    pub tags: Vec<String>,

    /// Optional summary from the metadata.
    pub summary: Option<String>,

    /// Whether the document is marked as a draft.
    pub draft: bool,

    /// Markdown source without frontmatter.
    pub raw_body: String,

    /// Rendered HTML body.
    pub rendered_body: String,

    /// Estimated reading time.
    pub reading_time_minutes: usize,

    /// Site-relative URL, `/posts/<id>/`.
    pub url: String,

    /// Additional metadata fields, verbatim.
    pub extra: BTreeMap<String, serde_yaml::Value>,

    /// Source file path.
    pub source_path: PathBuf,
}

impl Document {
    /// Site-relative URL for a document id.
    pub fn url_for_id(id: &str) -> String {
        format!("/posts/{id}/")
    }

    /// Plain-text excerpt of the rendered body.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let text = strip_html(&self.rendered_body);
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        truncate_at_word_boundary(&text, max_chars)
    }

    /// Number of whitespace-separated words in the source body.
    pub fn word_count(&self) -> usize {
        word_count(&self.raw_body)
    }
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reading time in minutes, never below `min_minutes`.
pub fn reading_time(words: usize, words_per_minute: usize, min_minutes: usize) -> usize {
    words.div_ceil(words_per_minute.max(1)).max(min_minutes)
}

/// Format a date for display using the given locale ("January 5, 2024" for en_US).
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return date.format("%Y-%m-%d").to_string();
    };
    let pattern = match locale {
        Locale::en_US => "%B %-d, %Y",
        _ => "%-d %B %Y",
    };
    midnight
        .and_utc()
        .format_localized(pattern, locale)
        .to_string()
}

/// Parse a metadata date. Accepts `YYYY-MM-DD` and RFC 3339 timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    // "2024-01-14 10:00" and similar: take the leading date.
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Strip HTML tags from content.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Truncate text at word boundary, respecting UTF-8 character boundaries.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        return text.to_string();
    }

    let truncate_byte_idx = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let truncated = &text[..truncate_byte_idx];

    if let Some(last_space_byte) = truncated.rfind(' ') {
        format!("{}...", &truncated[..last_space_byte])
    } else {
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            id: "hello".to_string(),
            title: "Hello".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).expect("date"),
            formatted_date: String::new(),
            author: "Anonymous".to_string(),
            tags: vec![],
            summary: None,
            draft: false,
            raw_body: "one two three".to_string(),
            rendered_body: "<p>One <strong>two</strong>\n three</p>".to_string(),
            reading_time_minutes: 1,
            url: Document::url_for_id("hello"),
            extra: BTreeMap::new(),
            source_path: PathBuf::from("posts/hello.md"),
        }
    }

    #[test]
    fn test_source_from_path() {
        let source = DocumentSource::from_path(Path::new("posts/My First_Post.md"), None)
            .expect("source");
        assert_eq!(source.id, "my-first-post");
        assert!(DocumentSource::from_path(Path::new("posts/!!!.md"), None).is_none());
    }

    #[test]
    fn test_url_for_id() {
        assert_eq!(Document::url_for_id("hello-world"), "/posts/hello-world/");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(0, 200, 1), 1);
        assert_eq!(reading_time(200, 200, 1), 1);
        assert_eq!(reading_time(201, 200, 1), 2);
        assert_eq!(reading_time(1000, 200, 1), 5);
        assert_eq!(reading_time(10, 200, 3), 3);
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).expect("date");
        assert_eq!(format_date(date, Locale::en_US), "January 5, 2024");
        assert_eq!(format_date(date, Locale::de_DE), "5 Januar 2024");
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 14);
        assert_eq!(parse_date("2024-01-14"), expected);
        assert_eq!(parse_date("2024-01-14T10:00:00Z"), expected);
        assert_eq!(parse_date("2024-01-14 10:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_excerpt_and_word_count() {
        let doc = sample();
        assert_eq!(doc.excerpt(100), "One two three");
        assert_eq!(doc.excerpt(8), "One two...");
        assert_eq!(doc.word_count(), 3);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>World</strong></p>"),
            "Hello World"
        );
        assert_eq!(strip_html("No tags here"), "No tags here");
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        let text = "Hello world this is a test";
        assert_eq!(truncate_at_word_boundary(text, 100), text);
        assert_eq!(truncate_at_word_boundary(text, 11), "Hello...");
        assert_eq!(truncate_at_word_boundary(text, 12), "Hello world...");

        let chinese_text = "你好世界 Hello World";
        assert_eq!(truncate_at_word_boundary(chinese_text, 7), "你好世界...");
    }
}
