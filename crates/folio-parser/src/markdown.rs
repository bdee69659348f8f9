//! Markdown renderer using pulldown-cmark.

use std::collections::HashMap;

use folio_core::slugify;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::{Renderer, Result};

/// Markdown renderer with GitHub-flavoured extensions and heading anchors.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Render markdown to HTML.
    pub fn render_html(&self, source: &str) -> String {
        let mut events: Vec<Event<'_>> = Parser::new_ext(source, self.options).collect();
        assign_heading_ids(&mut events);

        let mut out = String::with_capacity(source.len() + source.len() / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> Result<String> {
        Ok(self.render_html(source))
    }
}

/// Give every heading without an explicit `{#id}` a slug anchor.
///
/// Repeated anchors get a numeric suffix (`intro`, `intro-1`, ...).
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut i = 0;

    while i < events.len() {
        let unnamed_heading = matches!(&events[i], Event::Start(Tag::Heading { id: None, .. }));
        if !unnamed_heading {
            i += 1;
            continue;
        }

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        let mut anchor = slugify(&text);
        if anchor.is_empty() {
            anchor = "section".to_string();
        }
        let count = seen.entry(anchor.clone()).or_insert(0);
        if *count > 0 {
            anchor = format!("{anchor}-{count}");
        }
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
        i = end + 1;
    }
}
