//! HTML template system.
//!
//! A small directive language over a tree of [`Value`]s:
//!
//! - `{{path.to.value}}` substitutes a value (missing paths produce nothing)
//! - `{{#each path}} ... {{/each}}` repeats its body per sequence element,
//!   with `this`, `_index` and `_parent` available inside
//! - `{{#if cond}} ... {{else}} ... {{/if}}` where `cond` is a path or a
//!   `left op right` comparison using `==`, `===`, `!=` or `!==`
//!
//! Rendering never fails. Templates are looked up by name through
//! [`TemplateLoader`], which prefers project files over built-in defaults.

pub mod defaults;
pub mod loader;
pub mod parse;
pub mod render;
pub mod resolve;
pub mod value;

pub use loader::TemplateLoader;
pub use render::{Template, render_str};
pub use resolve::{Scope, resolve_path};
pub use value::{LazyValue, Map, Value};

/// Data a template is rendered against.
///
/// Built up key by key, then handed to [`Template::render`] as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    vars: Map,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Create context with an additional variable.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Check if a variable exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Merge every variable of `other` over this context.
    pub fn extend(&mut self, other: Map) {
        self.vars.extend(other);
    }

    /// The context as a single map value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Map(self.vars)
    }
}

impl From<TemplateContext> for Value {
    fn from(context: TemplateContext) -> Self {
        context.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_context() {
        let mut ctx = TemplateContext::new();
        ctx.insert("title", "Hello");
        let ctx = ctx.with_var("count", 3usize);

        assert_eq!(ctx.get("title"), Some(&Value::from("Hello")));
        assert!(ctx.contains("count"));
        assert!(!ctx.contains("missing"));
    }

    #[test]
    fn test_render_context() {
        let ctx = TemplateContext::new()
            .with_var("title", "Hello World")
            .with_var("content", "<p>Content</p>");

        let html = render_str("<h1>{{ title }}</h1>{{ content }}", &ctx.into_value());
        assert_eq!(html, "<h1>Hello World</h1><p>Content</p>");
    }
}
