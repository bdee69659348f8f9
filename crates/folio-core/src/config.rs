//! Site configuration management.
//!
//! A [`Config`] is loaded once per build, validated, and has every relative
//! path resolved against the directory of the configuration file. It is then
//! handed to each component by reference.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::Locale;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Ordered navigation items.
    #[serde(default)]
    pub navigation: Vec<NavItem>,

    /// Free-form design tokens exposed to templates.
    #[serde(default)]
    pub appearance: BTreeMap<String, String>,

    /// Content settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Content, template and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Template loader settings.
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Markdown render settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// Language tag, also used to pick the date formatting locale.
    #[serde(default = "default_language")]
    pub language: String,
}

/// A single navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Link text.
    pub label: String,

    /// Link target.
    pub url: String,
}

/// Content settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Number of documents per listing page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,

    /// Whether templates should show reading time.
    #[serde(default = "default_true")]
    pub show_reading_time: bool,

    /// Author used when a document does not name one.
    #[serde(default = "default_author")]
    pub default_author: String,

    /// Reading speed used for reading time estimates.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: usize,

    /// Lower bound for reading time estimates, in minutes.
    #[serde(default = "default_min_reading_time")]
    pub min_reading_time: usize,

    /// Whether to include documents marked as drafts.
    #[serde(default)]
    pub drafts: bool,

    /// Posts directory, relative to `paths.content`.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,

    /// About page source, relative to `paths.content`.
    #[serde(default = "default_about_file")]
    pub about_file: PathBuf,
}

/// Directory configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Content root.
    #[serde(default = "default_content_dir")]
    pub content: PathBuf,

    /// Project template overrides.
    #[serde(default = "default_template_dir")]
    pub templates: PathBuf,

    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output: PathBuf,
}

/// Template loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Memoize loaded templates.
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Maximum number of memoized templates.
    #[serde(default = "default_template_cache_capacity")]
    pub cache_capacity: usize,
}

/// Markdown render configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Maximum number of memoized render results (0 disables the cache).
    #[serde(default = "default_render_cache_capacity")]
    pub cache_capacity: usize,
}

// Default value functions
fn default_language() -> String {
    "en-US".to_string()
}

fn default_true() -> bool {
    true
}

fn default_posts_per_page() -> usize {
    10
}

fn default_author() -> String {
    "Anonymous".to_string()
}

fn default_words_per_minute() -> usize {
    200
}

fn default_min_reading_time() -> usize {
    1
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_about_file() -> PathBuf {
    PathBuf::from("about.md")
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_template_cache_capacity() -> usize {
    64
}

fn default_render_cache_capacity() -> usize {
    256
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            posts_per_page: default_posts_per_page(),
            show_reading_time: true,
            default_author: default_author(),
            words_per_minute: default_words_per_minute(),
            min_reading_time: default_min_reading_time(),
            drafts: false,
            posts_dir: default_posts_dir(),
            about_file: default_about_file(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content_dir(),
            templates: default_template_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            cache: true,
            cache_capacity: default_template_cache_capacity(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_render_cache_capacity(),
        }
    }
}

impl Config {
    /// Create a configuration with default sections for the given site.
    #[must_use]
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                base_url: base_url.into(),
                description: None,
                author: None,
                language: default_language(),
            },
            navigation: Vec::new(),
            appearance: BTreeMap::new(),
            content: ContentConfig::default(),
            paths: PathsConfig::default(),
            templates: TemplatesConfig::default(),
            render: RenderConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        config.resolve_paths(path)?;
        Ok(config)
    }

    /// Load configuration with `FOLIO__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.validate()?;
        config.resolve_paths(path)?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.content.posts_per_page == 0 {
            return Err(CoreError::config("content.posts_per_page must be at least 1"));
        }

        if self.content.words_per_minute == 0 {
            return Err(CoreError::config(
                "content.words_per_minute must be at least 1",
            ));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Make every configured directory absolute, relative to the config file.
    fn resolve_paths(&mut self, config_path: &Path) -> Result<()> {
        let root = config_path.parent().unwrap_or(Path::new(""));
        for dir in [
            &mut self.paths.content,
            &mut self.paths.templates,
            &mut self.paths.output,
        ] {
            if dir.is_relative() {
                *dir = std::path::absolute(root.join(&*dir))?;
            }
        }
        Ok(())
    }

    /// Directory holding the post documents.
    #[must_use]
    pub fn posts_dir(&self) -> PathBuf {
        self.paths.content.join(&self.content.posts_dir)
    }

    /// Source file of the optional about page.
    #[must_use]
    pub fn about_path(&self) -> PathBuf {
        self.paths.content.join(&self.content.about_file)
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Locale used for formatted dates.
    ///
    /// `en-US` and `en_US` are both accepted; a bare language such as `de`
    /// maps to `de_DE`. Unknown tags fall back to `en_US`.
    #[must_use]
    pub fn date_locale(&self) -> Locale {
        let tag = self.site.language.replace('-', "_");
        if let Ok(locale) = Locale::try_from(tag.as_str()) {
            return locale;
        }
        if !tag.contains('_') {
            let regional = format!("{tag}_{}", tag.to_uppercase());
            if let Ok(locale) = Locale::try_from(regional.as_str()) {
                return locale;
            }
        }
        tracing::debug!(language = %self.site.language, "unknown locale, using en_US");
        Locale::en_US
    }
}
