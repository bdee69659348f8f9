//! Build orchestration.
//!
//! Coordinates the full site build: load configuration, collect content,
//! then assemble and write every page type. Page types are independent; one
//! failing is logged and the others still run.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use folio_core::{Config, CoreError};
use folio_parser::default_renderer;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    collector::{
        CollectorError, ContentCollector, ContentWarning, SiteContent, TagIndex, extract_tag_index,
    },
    html::{AssembleError, HtmlGenerator, OutputPage},
    sitemap::{SitemapError, SitemapGenerator},
    template::TemplateLoader,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configuration could not be loaded or is invalid.
    #[error("config error: {0}")]
    Config(#[from] CoreError),

    /// Content could not be collected.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// A page could not be written.
    #[error("HTML error: {0}")]
    Assemble(#[from] AssembleError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Inputs to a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Path to the TOML configuration file.
    pub config_path: PathBuf,

    /// Replaces `paths.output` when set.
    pub output_dir: Option<PathBuf>,

    /// Report every written page at INFO.
    pub verbose: bool,

    /// Log the resolved configuration before building.
    pub debug: bool,

    /// Ignore `FOLIO__*` environment overrides.
    pub no_env: bool,
}

impl BuildOptions {
    /// Options for the given configuration file.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            ..Self::default()
        }
    }

    /// Set the output directory override.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

/// The kinds of output a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Home page and the paginated listing after it.
    Listing,
    Documents,
    Tags,
    TagIndex,
    About,
    Sitemap,
    NotFound,
}

impl PageKind {
    /// Page kinds assembled concurrently, before the error page.
    pub const CONCURRENT: [PageKind; 6] = [
        Self::Listing,
        Self::Documents,
        Self::Tags,
        Self::TagIndex,
        Self::About,
        Self::Sitemap,
    ];

    /// Whether a failure of this kind makes the build unsuccessful.
    pub fn is_core(&self) -> bool {
        matches!(self, Self::Listing | Self::Documents)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Listing => "listing",
            Self::Documents => "documents",
            Self::Tags => "tags",
            Self::TagIndex => "tag index",
            Self::About => "about",
            Self::Sitemap => "sitemap",
            Self::NotFound => "error page",
        })
    }
}

/// Outcome of a build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Files written, sitemap included.
    pub pages_written: usize,

    /// Published documents.
    pub documents: usize,

    /// Distinct tags.
    pub tags: usize,

    /// Recoverable content problems.
    pub warnings: Vec<ContentWarning>,

    /// Page kinds that could not be produced.
    pub failed: Vec<PageKind>,

    pub duration: Duration,
}

impl BuildReport {
    /// Whether the home page and every document page were produced.
    pub fn core_pages_ok(&self) -> bool {
        !self.failed.iter().any(PageKind::is_core)
    }
}

/// Build a site from a configuration file.
///
/// Returns an error only when the configuration cannot be loaded or the
/// posts directory cannot be read. In both cases an error page is still
/// written when an output directory is known.
pub fn build_site(options: &BuildOptions) -> Result<BuildReport> {
    let loaded = if options.no_env {
        Config::load(&options.config_path)
    } else {
        Config::load_with_env(&options.config_path)
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!(
                path = %options.config_path.display(),
                error = %e,
                "failed to load configuration"
            );
            match &options.output_dir {
                Some(dir) => write_fallback_error_page(dir),
                None => warn!("no output directory known, error page not written"),
            }
            return Err(e.into());
        }
    };

    if let Some(dir) = &options.output_dir {
        config.paths.output = dir.clone();
    }
    if options.debug {
        info!(config = ?config, "resolved configuration");
    }

    Builder::new(&config).verbose(options.verbose).build()
}

/// Write `404.html` with built-in templates and a placeholder site.
fn write_fallback_error_page(output_dir: &Path) {
    let config = Config::new("Site", "/");
    let templates = TemplateLoader::builtin_only();
    let page = HtmlGenerator::new(&config, &templates).error_page();
    match page.write_to(output_dir) {
        Ok(path) => info!(path = %path.display(), "wrote fallback error page"),
        Err(e) => warn!(error = %e, "failed to write fallback error page"),
    }
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder<'a> {
    config: &'a Config,
    verbose: bool,
}

impl<'a> Builder<'a> {
    /// Create a builder writing to `config.paths.output`.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Report every written page at INFO instead of DEBUG.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let output_dir = self.config.paths.output.as_path();

        info!(
            content = %self.config.paths.content.display(),
            output = %output_dir.display(),
            "starting build"
        );

        fs::create_dir_all(output_dir)?;

        let templates = TemplateLoader::from_config(self.config);
        let generator = HtmlGenerator::new(self.config, &templates);

        let renderer = default_renderer(self.config.render.cache_capacity);
        let content = match ContentCollector::new(self.config, &*renderer).collect() {
            Ok(content) => content,
            Err(e) => {
                error!(error = %e, "content collection failed");
                if let Err(write_err) = self.write_pages(vec![generator.error_page()]) {
                    warn!(error = %write_err, "failed to write error page");
                }
                return Err(e.into());
            }
        };

        let tags = extract_tag_index(&content.documents);

        let results: Vec<(PageKind, Result<usize>)> = PageKind::CONCURRENT
            .par_iter()
            .map(|&kind| (kind, self.generate(kind, &generator, &content, &tags)))
            .collect();

        let mut report = BuildReport {
            documents: content.documents.len(),
            tags: tags.len(),
            ..BuildReport::default()
        };

        for (kind, result) in results {
            match result {
                Ok(written) => report.pages_written += written,
                Err(e) => {
                    warn!(kind = %kind, error = %e, "skipping page type");
                    report.failed.push(kind);
                }
            }
        }

        match self.generate(PageKind::NotFound, &generator, &content, &tags) {
            Ok(written) => report.pages_written += written,
            Err(e) => {
                warn!(kind = %PageKind::NotFound, error = %e, "skipping page type");
                report.failed.push(PageKind::NotFound);
            }
        }

        report.warnings = content.warnings;
        report.duration = start.elapsed();

        info!(
            pages = report.pages_written,
            documents = report.documents,
            tags = report.tags,
            warnings = report.warnings.len(),
            failed = report.failed.len(),
            duration_ms = report.duration.as_millis() as u64,
            "build complete"
        );

        Ok(report)
    }

    fn generate(
        &self,
        kind: PageKind,
        generator: &HtmlGenerator<'_>,
        content: &SiteContent,
        tags: &TagIndex<'_>,
    ) -> Result<usize> {
        debug!(kind = %kind, "generating");
        match kind {
            PageKind::Listing => self.write_pages(generator.listing_pages(&content.documents)),
            PageKind::Documents => self.write_pages(generator.document_pages(&content.documents)),
            PageKind::Tags => self.write_pages(generator.tag_pages(tags)),
            PageKind::TagIndex => self.write_pages(vec![generator.tag_index_page(tags)]),
            PageKind::About => {
                let about = generator.about_page(content.about.as_ref());
                self.write_pages(about.into_iter().collect())
            }
            PageKind::Sitemap => self.write_sitemap(content, tags),
            PageKind::NotFound => self.write_pages(vec![generator.error_page()]),
        }
    }

    fn write_pages(&self, pages: Vec<OutputPage>) -> Result<usize> {
        let output_dir = self.config.paths.output.as_path();
        pages
            .par_iter()
            .map(|page| {
                let path = page.write_to(output_dir)?;
                self.report_write(&path);
                Ok(())
            })
            .collect::<Result<Vec<()>>>()
            .map(|written| written.len())
    }

    fn write_sitemap(&self, content: &SiteContent, tags: &TagIndex<'_>) -> Result<usize> {
        let path = self.config.paths.output.join("sitemap.xml");
        let mut file = fs::File::create(&path)?;
        SitemapGenerator::new(self.config).write_to(
            &content.documents,
            tags,
            content.about.is_some(),
            &mut file,
        )?;
        self.report_write(&path);
        Ok(1)
    }

    fn report_write(&self, path: &Path) {
        if self.verbose {
            info!(path = %path.display(), "wrote");
        } else {
            debug!(path = %path.display(), "wrote");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn test_config(root: &Path) -> Config {
        let mut config = Config::new("Test Site", "https://example.com");
        config.paths.content = root.join("content");
        config.paths.templates = root.join("templates");
        config.paths.output = root.join("public");
        config
    }

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, text).expect("write");
    }

    #[test]
    fn test_build_empty_site() {
        let dir = TempDir::new().expect("tempdir");
        let config = test_config(dir.path());

        let report = Builder::new(&config).build().expect("build");
        assert!(report.core_pages_ok());
        assert_eq!(report.documents, 0);
        // Home, tag index, sitemap and error page.
        assert_eq!(report.pages_written, 4);

        let output = &config.paths.output;
        assert!(output.join("index.html").exists());
        assert!(output.join("tags/index.html").exists());
        assert!(output.join("sitemap.xml").exists());
        assert!(output.join("404.html").exists());
        assert!(!output.join("about/index.html").exists());
    }

    #[test]
    fn test_build_with_content() {
        let dir = TempDir::new().expect("tempdir");
        let config = test_config(dir.path());
        let posts = config.posts_dir();
        write(
            &posts.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\ntags: [rust]\n---\n\nHello world",
        );
        write(
            &posts.join("later.md"),
            "---\ntitle: Later\ndate: 2024-03-01\n---\n\nLater post",
        );
        write(&config.about_path(), "---\ntitle: About me\n---\n\nAbout text");

        let report = Builder::new(&config).verbose(true).build().expect("build");
        assert!(report.failed.is_empty());
        assert_eq!(report.documents, 2);
        assert_eq!(report.tags, 1);

        let output = &config.paths.output;
        assert!(output.join("posts/hello/index.html").exists());
        assert!(output.join("posts/later/index.html").exists());
        assert!(output.join("tags/rust/index.html").exists());
        assert!(output.join("about/index.html").exists());

        let home = fs::read_to_string(output.join("index.html")).expect("home");
        let later = home.find("/posts/later/").expect("later");
        let hello = home.find("/posts/hello/").expect("hello");
        assert!(later < hello);
    }

    #[test]
    fn test_unwritable_page_type_is_skipped() {
        let dir = TempDir::new().expect("tempdir");
        let config = test_config(dir.path());
        write(
            &config.posts_dir().join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\ntags: [rust]\n---\n\nHello",
        );
        // A file where the tags directory should be.
        write(&config.paths.output.join("tags"), "not a directory");

        let report = Builder::new(&config).build().expect("build");
        assert!(report.failed.contains(&PageKind::Tags));
        assert!(report.failed.contains(&PageKind::TagIndex));
        assert!(report.core_pages_ok());
        assert!(config.paths.output.join("posts/hello/index.html").exists());
        assert!(config.paths.output.join("404.html").exists());
    }

    #[test]
    fn test_unreadable_posts_dir_is_fatal() {
        let dir = TempDir::new().expect("tempdir");
        let config = test_config(dir.path());
        // A file where the posts directory should be.
        write(&config.posts_dir(), "not a directory");

        let err = Builder::new(&config).build().expect_err("unreadable posts");
        assert!(matches!(
            err,
            BuildError::Collector(CollectorError::Unreadable { .. })
        ));
        assert!(config.paths.output.join("404.html").is_file());
        assert!(!config.paths.output.join("index.html").exists());
    }

    #[test]
    fn test_missing_config_writes_error_page() {
        let dir = TempDir::new().expect("tempdir");
        let output = dir.path().join("public");
        let options = BuildOptions::new(dir.path().join("missing.toml")).with_output_dir(&output);

        let err = build_site(&options).expect_err("missing config");
        assert!(matches!(err, BuildError::Config(_)));
        assert!(output.join("404.html").exists());
    }

    #[test]
    fn test_build_site_without_env_overrides() {
        let dir = TempDir::new().expect("tempdir");
        let config_path = dir.path().join("folio.toml");
        write(
            &config_path,
            "[site]\ntitle = \"Plain\"\nbase_url = \"https://example.com\"\n",
        );

        let options = BuildOptions {
            no_env: true,
            ..BuildOptions::new(&config_path)
        };
        let report = build_site(&options).expect("build");
        assert!(report.core_pages_ok());

        let home = fs::read_to_string(dir.path().join("public/index.html")).expect("home");
        assert!(home.contains("<title>Plain</title>"));
    }

    #[test]
    fn test_core_pages_ok() {
        let mut report = BuildReport::default();
        assert!(report.core_pages_ok());
        report.failed.push(PageKind::Sitemap);
        assert!(report.core_pages_ok());
        report.failed.push(PageKind::Documents);
        assert!(!report.core_pages_ok());
    }
}
