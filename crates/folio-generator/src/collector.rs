//! Content collection and organization.
//!
//! Walks the posts directory, turns every markdown file into a [`Document`]
//! and groups documents by tag. A single bad document is skipped with a
//! warning; only an unreadable posts directory stops collection.

use std::{
    collections::{BTreeMap, HashSet},
    fmt, fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Locale, NaiveDate, Utc};
use folio_core::{
    Config, Document, DocumentSource, Frontmatter,
    document::{format_date, parse_date, reading_time, word_count},
    frontmatter::parse_frontmatter,
    slug::title_from_slug,
    slugify,
};
use folio_parser::{RenderError, Renderer};
use rayon::prelude::*;
use serde_yaml::{Mapping, Value as YamlValue};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The posts directory exists but cannot be listed.
    #[error("content directory {path} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The markdown renderer rejected a document body.
    #[error("failed to render {source_id}: {error}")]
    Render {
        source_id: String,
        #[source]
        error: RenderError,
    },

    /// The file name does not produce a usable id.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

impl CollectorError {
    /// Stage of the pipeline the error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Io { .. } | Self::Unreadable { .. } | Self::InvalidPath(_) => Stage::Discovery,
            Self::Render { .. } => Stage::Render,
        }
    }
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Pipeline stage a warning was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovery,
    Frontmatter,
    Metadata,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discovery => "discovery",
            Self::Frontmatter => "frontmatter",
            Self::Metadata => "metadata",
            Self::Render => "render",
        })
    }
}

/// A recoverable problem with one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWarning {
    /// Source file the warning is about.
    pub source_id: String,

    /// Where in the pipeline it happened.
    pub stage: Stage,

    /// What happened.
    pub message: String,
}

impl fmt::Display for ContentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.source_id, self.stage, self.message)
    }
}

/// A document plus the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub warnings: Vec<ContentWarning>,
}

/// Collected site content.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// Published documents, newest first.
    pub documents: Vec<Document>,

    /// The optional about page.
    pub about: Option<Document>,

    /// Every recoverable problem met during collection.
    pub warnings: Vec<ContentWarning>,

    /// Source files that produced no document.
    pub skipped: usize,

    /// Drafts left out of the build.
    pub drafts: usize,
}

/// Turns source files into documents.
pub struct ContentCollector<'a> {
    config: &'a Config,
    renderer: &'a dyn Renderer,
    locale: Locale,
}

impl<'a> ContentCollector<'a> {
    /// Create a collector for the given configuration and body renderer.
    pub fn new(config: &'a Config, renderer: &'a dyn Renderer) -> Self {
        Self {
            config,
            renderer,
            locale: config.date_locale(),
        }
    }

    /// Collect the posts directory and the about page.
    pub fn collect(&self) -> Result<SiteContent> {
        let posts_dir = self.config.posts_dir();
        info!(dir = %posts_dir.display(), "collecting content");

        let mut content = self.load_all_documents(&posts_dir)?;

        let about_path = self.config.about_path();
        match self.load_page(&about_path, "/about/") {
            Ok(Some(loaded)) => {
                content.warnings.extend(loaded.warnings);
                content.about = Some(loaded.document);
            }
            Ok(None) => debug!(path = %about_path.display(), "no about page"),
            Err(e) => {
                warn!(path = %about_path.display(), error = %e, "skipping about page");
                content.warnings.push(ContentWarning {
                    source_id: about_path.display().to_string(),
                    stage: e.stage(),
                    message: e.to_string(),
                });
            }
        }

        info!(
            documents = content.documents.len(),
            skipped = content.skipped,
            drafts = content.drafts,
            warnings = content.warnings.len(),
            "collected content"
        );
        Ok(content)
    }

    /// Build a document from raw source text.
    ///
    /// Missing titles and dates are synthesized and reported as warnings.
    /// Fails only when the body cannot be rendered.
    pub fn load_document(&self, raw: &str, source: &DocumentSource) -> Result<LoadedDocument> {
        self.build_document(raw, source, Document::url_for_id(&source.id))
    }

    /// Load every markdown file below `dir`, newest first.
    ///
    /// A missing directory yields no documents. Files are loaded in parallel
    /// and kept in discovery order before the stable sort by date, so equal
    /// dates keep their file-name order.
    pub fn load_all_documents(&self, dir: &Path) -> Result<SiteContent> {
        let mut content = SiteContent::default();

        if !dir.exists() {
            warn!(dir = %dir.display(), "content directory does not exist");
            return Ok(content);
        }
        fs::read_dir(dir).map_err(|source| CollectorError::Unreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let files = find_documents(dir);
        debug!(count = files.len(), "found content files");

        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.load_file(path)))
            .collect();

        let mut seen = HashSet::new();
        for (path, result) in results {
            let loaded = match result {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        stage = %e.stage(),
                        error = %e,
                        "skipping document"
                    );
                    content.warnings.push(ContentWarning {
                        source_id: path.display().to_string(),
                        stage: e.stage(),
                        message: e.to_string(),
                    });
                    content.skipped += 1;
                    continue;
                }
            };

            content.warnings.extend(loaded.warnings);
            let document = loaded.document;

            if document.draft && !self.config.content.drafts {
                debug!(id = %document.id, "skipping draft");
                content.drafts += 1;
                continue;
            }
            if !seen.insert(document.id.clone()) {
                note(
                    &mut content.warnings,
                    &path.display().to_string(),
                    Stage::Discovery,
                    format!("duplicate id `{}`, keeping the first file", document.id),
                );
                content.skipped += 1;
                continue;
            }
            content.documents.push(document);
        }

        content.documents.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(content)
    }

    /// Load a standalone page served at `url`. Returns `None` if the file is
    /// absent.
    pub fn load_page(&self, path: &Path, url: &str) -> Result<Option<LoadedDocument>> {
        if !path.is_file() {
            return Ok(None);
        }
        let (raw, source) = read_source(path)?;
        self.build_document(&raw, &source, url.to_string()).map(Some)
    }

    fn load_file(&self, path: &Path) -> Result<LoadedDocument> {
        let (raw, source) = read_source(path)?;
        self.load_document(&raw, &source)
    }

    fn build_document(
        &self,
        raw: &str,
        source: &DocumentSource,
        url: String,
    ) -> Result<LoadedDocument> {
        let label = source.label();
        let mut warnings = Vec::new();

        let Frontmatter { mut metadata, body } = match parse_frontmatter(raw, &label) {
            Ok(frontmatter) => frontmatter,
            Err(e) => {
                note(
                    &mut warnings,
                    &label,
                    Stage::Frontmatter,
                    format!("{e}, treating the whole file as body"),
                );
                Frontmatter {
                    metadata: Mapping::new(),
                    body: raw.to_string(),
                }
            }
        };

        let title = match take_text(&mut metadata, "title") {
            Some(title) => title,
            None => {
                let title = title_from_slug(&source.id);
                note(
                    &mut warnings,
                    &label,
                    Stage::Metadata,
                    format!("missing title, using \"{title}\""),
                );
                title
            }
        };

        let date = match take_text(&mut metadata, "date") {
            Some(text) => parse_date(&text).unwrap_or_else(|| {
                let date = fallback_date(source.modified);
                note(
                    &mut warnings,
                    &label,
                    Stage::Metadata,
                    format!("unparseable date \"{text}\", using {date}"),
                );
                date
            }),
            None => {
                let date = fallback_date(source.modified);
                note(&mut warnings, &label, Stage::Metadata, format!("missing date, using {date}"));
                date
            }
        };

        let author = take_text(&mut metadata, "author")
            .unwrap_or_else(|| self.config.content.default_author.clone());
        let tags = take_tags(&mut metadata);
        let summary = take_text(&mut metadata, "summary");
        let draft = matches!(
            metadata.remove("draft"),
            Some(YamlValue::Bool(true))
        );

        let extra: BTreeMap<String, YamlValue> = metadata
            .into_iter()
            .filter_map(|(key, value)| match key {
                YamlValue::String(key) => Some((key, value)),
                _ => None,
            })
            .collect();

        let rendered_body = self
            .renderer
            .render(&body)
            .map_err(|error| CollectorError::Render {
                source_id: label.clone(),
                error,
            })?;

        let content = &self.config.content;
        let document = Document {
            id: source.id.clone(),
            title,
            date,
            formatted_date: format_date(date, self.locale),
            author,
            tags,
            summary,
            draft,
            reading_time_minutes: reading_time(
                word_count(&body),
                content.words_per_minute,
                content.min_reading_time,
            ),
            raw_body: body,
            rendered_body,
            url,
            extra,
            source_path: source.path.clone(),
        };

        Ok(LoadedDocument { document, warnings })
    }
}

impl fmt::Debug for ContentCollector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCollector")
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

fn read_source(path: &Path) -> Result<(String, DocumentSource)> {
    let io_error = |source| CollectorError::Io {
        path: path.to_path_buf(),
        source,
    };
    let raw = fs::read_to_string(path).map_err(io_error)?;
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    let source = DocumentSource::from_path(path, modified)
        .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;
    Ok((raw, source))
}

/// Markdown files below `dir` in file-name order, hidden entries skipped.
fn find_documents(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_markdown(entry.path()))
        .map(DirEntry::into_path)
        .collect()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || name.starts_with('_'))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

fn fallback_date(modified: Option<DateTime<Utc>>) -> NaiveDate {
    modified.unwrap_or_else(Utc::now).date_naive()
}

fn note(warnings: &mut Vec<ContentWarning>, source_id: &str, stage: Stage, message: String) {
    warn!(source = source_id, stage = %stage, "{message}");
    warnings.push(ContentWarning {
        source_id: source_id.to_string(),
        stage,
        message,
    });
}

/// Remove a scalar field and return it as trimmed, non-empty text.
fn take_text(metadata: &mut Mapping, key: &str) -> Option<String> {
    metadata
        .remove(key)
        .as_ref()
        .and_then(scalar_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

/// Tags as a list or a comma-separated string, trimmed and de-duplicated.
fn take_tags(metadata: &mut Mapping) -> Vec<String> {
    let raw: Vec<String> = match metadata.remove("tags") {
        Some(YamlValue::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(YamlValue::String(list)) => list.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// URL of a tag page.
pub fn tag_url(slug: &str) -> String {
    format!("/tags/{slug}/")
}

/// Documents sharing one tag.
#[derive(Debug, Clone)]
pub struct TagEntry<'a> {
    /// Display name, as first seen.
    pub name: String,

    /// URL-safe form of the name.
    pub slug: String,

    /// Documents in processing order.
    pub documents: Vec<&'a Document>,
}

impl TagEntry<'_> {
    /// Site-relative URL of the tag page.
    pub fn url(&self) -> String {
        tag_url(&self.slug)
    }
}

/// Documents grouped by tag.
///
/// Tags are keyed by slug, so `Rust` and `rust` share one entry under the
/// name seen first.
#[derive(Debug, Default)]
pub struct TagIndex<'a> {
    entries: BTreeMap<String, TagEntry<'a>>,
}

impl<'a> TagIndex<'a> {
    /// Entry for a tag name.
    pub fn get(&self, tag: &str) -> Option<&TagEntry<'a>> {
        self.entries.get(&slugify(tag))
    }

    /// Entries in slug order.
    pub fn iter(&self) -> impl Iterator<Item = &TagEntry<'a>> {
        self.entries.values()
    }

    /// Entries sorted alphabetically by name, ignoring case.
    pub fn sorted_by_name(&self) -> Vec<&TagEntry<'a>> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        entries
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no document has a tag.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group documents by tag, keeping document order within each tag.
pub fn extract_tag_index(documents: &[Document]) -> TagIndex<'_> {
    let mut index = TagIndex::default();

    for document in documents {
        let mut seen_here = HashSet::new();
        for tag in &document.tags {
            let slug = slugify(tag);
            if slug.is_empty() {
                debug!(tag = %tag, id = %document.id, "tag has no usable slug");
                continue;
            }
            if !seen_here.insert(slug.clone()) {
                continue;
            }
            index
                .entries
                .entry(slug.clone())
                .or_insert_with(|| TagEntry {
                    name: tag.clone(),
                    slug,
                    documents: Vec::new(),
                })
                .documents
                .push(document);
        }
    }

    index
}
