//! HTML generation from collected content.
//!
//! Every page is a content fragment rendered from a page-type template, then
//! wrapped in the `base` template with title, description and canonical URL.
//! Which template applies is the only layout decision made here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Datelike, Utc};
use folio_core::{Config, Document};
use thiserror::Error;
use tracing::debug;

use crate::{
    collector::{TagEntry, TagIndex, tag_url},
    paginate::{PageWindow, PaginateOptions, PaginationView, output_file, page_url, paginate},
    template::{Map, Template, TemplateContext, TemplateLoader, Value},
};

/// Length of the plain-text excerpt offered when a document has no summary.
pub const EXCERPT_CHARS: usize = 160;

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Writing a page failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A page would land outside the output directory.
    #[error("refusing to write outside the output directory: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, AssembleError>;

/// A finished page and where it goes, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPage {
    pub path: PathBuf,
    pub html: String,
}

impl OutputPage {
    /// Page served at a site-relative URL such as `/posts/hello/`.
    pub fn at_url(url: &str, html: String) -> Self {
        Self {
            path: PathBuf::from(output_file(url)),
            html,
        }
    }

    /// Write below `root`, creating parent directories. Returns the full path.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf> {
        if self.path.is_absolute()
            || self
                .path
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(AssembleError::InvalidPath(self.path.clone()));
        }

        let target = root.join(&self.path);
        let write_error = |source| AssembleError::Write {
            path: target.clone(),
            source,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&target, &self.html).map_err(write_error)?;
        Ok(target)
    }
}

/// Title, description and location of a page, for the base template.
#[derive(Debug, Clone, Copy)]
struct PageMeta<'m> {
    title: &'m str,
    description: Option<&'m str>,
    url: &'m str,
    is_home: bool,
}

/// Page assembler.
#[derive(Debug)]
pub struct HtmlGenerator<'a> {
    config: &'a Config,
    templates: &'a TemplateLoader,
    base: Template,
    build_time: DateTime<Utc>,
}

impl<'a> HtmlGenerator<'a> {
    /// Create a generator over a configuration and template source.
    pub fn new(config: &'a Config, templates: &'a TemplateLoader) -> Self {
        Self {
            config,
            templates,
            base: templates.compile("base"),
            build_time: Utc::now(),
        }
    }

    /// Listing pages, newest first, `per_page` documents each.
    ///
    /// With no documents a single empty home page is still produced.
    pub fn listing_pages(&self, documents: &[Document]) -> Vec<OutputPage> {
        let list = self.templates.compile("list");
        let item = self.templates.compile("post-item");

        let windows = paginate(
            documents,
            PaginateOptions {
                per_page: self.config.content.posts_per_page,
                base_path: "/",
            },
        );
        if windows.is_empty() {
            let empty = PageWindow {
                page_number: 1,
                items: documents,
                is_first_page: true,
                pagination: PaginationView::new(1, 1),
                url: page_url("/", 1),
            };
            return vec![self.listing_page(&list, &item, &empty)];
        }

        windows
            .iter()
            .map(|window| self.listing_page(&list, &item, window))
            .collect()
    }

    fn listing_page(
        &self,
        list: &Template,
        item: &Template,
        window: &PageWindow<'_, Document>,
    ) -> OutputPage {
        debug!(page = window.page_number, "generating listing page");

        let ctx = TemplateContext::new()
            .with_var("site", self.site_value())
            .with_var("items", self.items_html(item, window.items.iter()))
            .with_var("is_first_page", window.is_first_page)
            .with_var("page_number", window.page_number)
            .with_var("pagination", pagination_value(&window.pagination, "/"));
        let content = list.render(&ctx.into_value());

        let title = if window.is_first_page {
            escape_html(&self.config.site.title)
        } else {
            format!("Page {}", window.page_number)
        };
        let description = self.config.site.description.as_deref().map(escape_html);
        let meta = PageMeta {
            title: &title,
            description: description.as_deref(),
            url: &window.url,
            is_home: window.is_first_page,
        };
        OutputPage::at_url(&window.url, self.wrap(meta, content))
    }

    /// One page per document.
    pub fn document_pages(&self, documents: &[Document]) -> Vec<OutputPage> {
        let post = self.templates.compile("post");
        documents
            .iter()
            .map(|doc| self.document_page(&post, doc))
            .collect()
    }

    fn document_page(&self, template: &Template, doc: &Document) -> OutputPage {
        debug!(id = %doc.id, "generating document page");

        let mut ctx = self.document_context(doc);
        ctx.insert("site", self.site_value());
        let content = template.render(&ctx.into_value());

        // The excerpt comes from rendered HTML and is already entity-safe.
        let description = match &doc.summary {
            Some(summary) => escape_html(summary),
            None => doc.excerpt(EXCERPT_CHARS),
        };
        let title = escape_html(&doc.title);
        let meta = PageMeta {
            title: &title,
            description: Some(description.as_str()).filter(|d| !d.is_empty()),
            url: &doc.url,
            is_home: false,
        };
        OutputPage::at_url(&doc.url, self.wrap(meta, content))
    }

    /// One page per tag, listing its documents newest first.
    pub fn tag_pages(&self, index: &TagIndex<'_>) -> Vec<OutputPage> {
        let template = self.templates.compile("tag");
        let item = self.templates.compile("post-item");

        index
            .iter()
            .map(|entry| {
                debug!(tag = %entry.name, "generating tag page");
                let ctx = TemplateContext::new()
                    .with_var("site", self.site_value())
                    .with_var("tag", tag_value(entry))
                    .with_var(
                        "items",
                        self.items_html(&item, entry.documents.iter().copied()),
                    );
                let content = template.render(&ctx.into_value());

                let url = entry.url();
                let title = format!("Tagged: {}", escape_html(&entry.name));
                let description = format!(
                    "{} posts tagged {}",
                    entry.documents.len(),
                    escape_html(&entry.name)
                );
                let meta = PageMeta {
                    title: &title,
                    description: Some(&description),
                    url: &url,
                    is_home: false,
                };
                OutputPage::at_url(&url, self.wrap(meta, content))
            })
            .collect()
    }

    /// Index of all tags, alphabetical, each with its document count.
    pub fn tag_index_page(&self, index: &TagIndex<'_>) -> OutputPage {
        let tags: Vec<Value> = index.sorted_by_name().into_iter().map(tag_value).collect();
        let ctx = TemplateContext::new()
            .with_var("site", self.site_value())
            .with_var("tags", tags)
            .with_var("count", index.len());
        let content = self.templates.compile("tags").render(&ctx.into_value());

        let url = "/tags/";
        let meta = PageMeta {
            title: "Tags",
            description: Some("All tags"),
            url,
            is_home: false,
        };
        OutputPage::at_url(url, self.wrap(meta, content))
    }

    /// The about page, if there is one.
    pub fn about_page(&self, about: Option<&Document>) -> Option<OutputPage> {
        let doc = about?;
        let mut ctx = self.document_context(doc);
        ctx.insert("site", self.site_value());
        let content = self.templates.compile("page").render(&ctx.into_value());

        let title = escape_html(&doc.title);
        let description = doc.summary.as_deref().map(escape_html);
        let meta = PageMeta {
            title: &title,
            description: description.as_deref(),
            url: &doc.url,
            is_home: false,
        };
        Some(OutputPage::at_url(&doc.url, self.wrap(meta, content)))
    }

    /// The fixed error page, written to `404.html`.
    pub fn error_page(&self) -> OutputPage {
        let ctx = TemplateContext::new()
            .with_var("site", self.site_value())
            .with_var("title", "Page not found")
            .with_var(
                "message",
                "The page you are looking for does not exist or has moved.",
            );
        let content = self.templates.compile("404").render(&ctx.into_value());

        let meta = PageMeta {
            title: "Page not found",
            description: None,
            url: "/404.html",
            is_home: false,
        };
        OutputPage {
            path: PathBuf::from("404.html"),
            html: self.wrap(meta, content),
        }
    }

    /// Template context for a single document.
    ///
    /// Extra metadata fields come first so computed fields always win.
    pub fn document_context(&self, doc: &Document) -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.extend(
            doc.extra
                .iter()
                .map(|(key, value)| (key.clone(), Value::from_yaml(value)))
                .collect(),
        );

        let tags: Vec<Value> = doc
            .tags
            .iter()
            .map(|name| {
                let slug = folio_core::slugify(name);
                Value::from_iter([
                    ("name", Value::from(escape_html(name))),
                    ("url", Value::from(tag_url(&slug))),
                    ("slug", Value::from(slug)),
                ])
            })
            .collect();

        ctx.insert("id", doc.id.as_str());
        ctx.insert("title", escape_html(&doc.title));
        ctx.insert("date", doc.date.format("%Y-%m-%d").to_string());
        ctx.insert("formatted_date", doc.formatted_date.as_str());
        ctx.insert("author", escape_html(&doc.author));
        ctx.insert("tags", tags);
        ctx.insert("summary", doc.summary.as_deref().map(escape_html));
        ctx.insert("excerpt", doc.excerpt(EXCERPT_CHARS));
        ctx.insert("content", doc.rendered_body.as_str());
        ctx.insert("reading_time", doc.reading_time_minutes);
        ctx.insert("show_reading_time", self.config.content.show_reading_time);
        ctx.insert("url", doc.url.as_str());
        ctx.insert("canonical_url", self.config.url_for(&doc.url));
        ctx
    }

    fn items_html<'d>(
        &self,
        item: &Template,
        documents: impl Iterator<Item = &'d Document>,
    ) -> String {
        documents
            .map(|doc| item.render(&self.document_context(doc).into_value()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn site_value(&self) -> Value {
        let site = &self.config.site;
        Value::from_iter([
            ("title", Value::from(escape_html(&site.title))),
            (
                "description",
                Value::from(site.description.as_deref().map(escape_html)),
            ),
            ("base_url", Value::from(site.base_url.as_str())),
            ("author", Value::from(site.author.as_deref().map(escape_html))),
            ("language", Value::from(site.language.as_str())),
        ])
    }

    /// Wrap a content fragment in the base template.
    fn wrap(&self, meta: PageMeta<'_>, content: String) -> String {
        let navigation: Vec<Value> = self
            .config
            .navigation
            .iter()
            .map(|item| {
                Value::from_iter([
                    ("label", Value::from(escape_html(&item.label))),
                    ("url", Value::from(item.url.as_str())),
                    ("active", Value::from(nav_active(&item.url, meta.url))),
                ])
            })
            .collect();

        let appearance: Map = self
            .config
            .appearance
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
            .collect();

        let build_time = self.build_time;
        let ctx = TemplateContext::new()
            .with_var("site", self.site_value())
            .with_var("navigation", navigation)
            .with_var("appearance", appearance)
            .with_var(
                "page",
                Value::from_iter([
                    ("title", Value::from(meta.title)),
                    ("description", Value::from(meta.description)),
                    ("canonical_url", Value::from(self.config.url_for(meta.url))),
                    ("url", Value::from(meta.url)),
                    ("is_home", Value::from(meta.is_home)),
                ]),
            )
            .with_var("content", content)
            .with_var(
                "year",
                Value::lazy(move || Value::from(i64::from(build_time.year()))),
            )
            .with_var(
                "build_time",
                Value::lazy(move || Value::from(build_time.to_rfc3339())),
            );

        self.base.render(&ctx.into_value())
    }
}

fn nav_active(item_url: &str, page_url: &str) -> bool {
    if item_url == "/" {
        page_url == "/"
    } else {
        page_url.starts_with(item_url)
    }
}

fn tag_value(entry: &TagEntry<'_>) -> Value {
    Value::from_iter([
        ("name", Value::from(escape_html(&entry.name))),
        ("slug", Value::from(entry.slug.as_str())),
        ("url", Value::from(entry.url())),
        ("count", Value::from(entry.documents.len())),
    ])
}

/// Pagination data for the `list` template.
pub fn pagination_value(view: &PaginationView, base_path: &str) -> Value {
    let pages: Vec<Value> = view
        .visible_pages()
        .map(|number| {
            Value::from_iter([
                ("number", Value::from(number)),
                ("url", Value::from(page_url(base_path, number))),
                ("is_current", Value::from(number == view.current_page)),
            ])
        })
        .collect();

    Value::from_iter([
        ("current_page", Value::from(view.current_page)),
        ("total_pages", Value::from(view.total_pages)),
        ("has_pages", Value::from(view.total_pages > 1)),
        ("pages", Value::from(pages)),
        ("show_first", Value::from(view.show_first)),
        ("first_url", Value::from(page_url(base_path, 1))),
        ("show_first_ellipsis", Value::from(view.show_first_ellipsis)),
        ("show_last", Value::from(view.show_last)),
        ("last_url", Value::from(page_url(base_path, view.total_pages))),
        ("show_last_ellipsis", Value::from(view.show_last_ellipsis)),
        ("has_prev", Value::from(view.has_prev())),
        (
            "prev_url",
            Value::from(page_url(base_path, view.current_page.saturating_sub(1))),
        ),
        ("has_next", Value::from(view.has_next())),
        (
            "next_url",
            Value::from(page_url(base_path, view.current_page + 1)),
        ),
    ])
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
