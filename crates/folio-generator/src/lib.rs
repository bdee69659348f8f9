//! Folio Generator Library
//!
//! Static site generation engine for Folio.
//!
//! # Modules
//!
//! - [`template`] - Directive templates, value resolution and the template loader
//! - [`collector`] - Content collection and the tag index
//! - [`paginate`] - Page windows and pagination bars
//! - [`html`] - HTML generation from collected content
//! - [`sitemap`] - XML sitemap generation
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod html;
pub mod paginate;
pub mod sitemap;
pub mod template;

pub use build::{BuildError, BuildOptions, BuildReport, Builder, PageKind, build_site};
pub use collector::{ContentCollector, ContentWarning, SiteContent, TagIndex, extract_tag_index};
pub use html::{HtmlGenerator, OutputPage};
pub use paginate::{PageWindow, PaginateOptions, PaginationView, paginate};
pub use sitemap::SitemapGenerator;
pub use template::{Template, TemplateContext, TemplateLoader, Value};
