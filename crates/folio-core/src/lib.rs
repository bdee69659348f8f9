//! Folio Core Library
//!
//! Core types, configuration, and error handling for the Folio static site generator.

pub mod config;
pub mod document;
pub mod error;
pub mod frontmatter;
pub mod slug;

pub use config::Config;
pub use document::{Document, DocumentSource};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use slug::slugify;
