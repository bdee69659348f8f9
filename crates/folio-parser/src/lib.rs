//! Folio Parser Library
//!
//! Turns markdown bodies into HTML. The generator only sees the [`Renderer`]
//! trait, so any text-to-HTML converter can stand in for [`MarkdownRenderer`].

pub mod cache;
pub mod markdown;

pub use cache::CachedRenderer;
pub use markdown::MarkdownRenderer;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer rejected the input.
    #[error("render failed: {0}")]
    Failed(String),
}

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Converts document source text to HTML.
pub trait Renderer: Send + Sync {
    /// Render source text to an HTML fragment.
    fn render(&self, source: &str) -> Result<String>;
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn render(&self, source: &str) -> Result<String> {
        (**self).render(source)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&self, source: &str) -> Result<String> {
        (**self).render(source)
    }
}

/// Markdown renderer wrapped in a render cache of the given capacity.
///
/// A capacity of zero returns an uncached renderer.
pub fn default_renderer(cache_capacity: usize) -> Box<dyn Renderer> {
    match CachedRenderer::new(MarkdownRenderer::new(), cache_capacity) {
        Some(cached) => Box::new(cached),
        None => Box::new(MarkdownRenderer::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_renderer_renders() {
        let renderer = default_renderer(8);
        let html = renderer.render("# Title").unwrap();
        assert!(html.contains("<h1"));
    }

    #[test]
    fn test_default_renderer_without_cache() {
        let renderer = default_renderer(0);
        let html = renderer.render("*em*").unwrap();
        assert!(html.contains("<em>em</em>"));
    }

    #[test]
    fn test_render_error_display() {
        let err = RenderError::Failed("bad input".to_string());
        assert_eq!(err.to_string(), "render failed: bad input");
    }
}
