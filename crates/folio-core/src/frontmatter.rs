//! Frontmatter parsing for content files.
//!
//! Both YAML (`---`) and TOML (`+++`) blocks are accepted. Either way the
//! metadata comes back as a YAML mapping so the rest of the pipeline deals
//! with a single value model.

use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// Raw frontmatter metadata plus the body that followed it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Metadata fields as written in the source.
    pub metadata: Mapping,

    /// Body text after the closing delimiter.
    pub body: String,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// Returns `None` when the content does not open with a delimiter line or the
/// block is never closed.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];

    // The closing delimiter must start a line.
    let closing_pos = after_first
        .match_indices(delimiter)
        .map(|(pos, _)| pos)
        .find(|&pos| pos == 0 || after_first[..pos].ends_with('\n'))?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string.
///
/// Content without a frontmatter block yields empty metadata and the full
/// text as body. A block that does not parse is an error; callers decide
/// whether to degrade.
pub fn parse_frontmatter(content: &str, source_id: &str) -> Result<Frontmatter> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok(Frontmatter {
            metadata: Mapping::new(),
            body: content.to_string(),
        });
    };

    let value = match format {
        FrontmatterFormat::Yaml => {
            if fm_str.is_empty() {
                Value::Mapping(Mapping::new())
            } else {
                serde_yaml::from_str::<Value>(fm_str)
                    .map_err(|e| CoreError::frontmatter(source_id, e.to_string()))?
            }
        }
        FrontmatterFormat::Toml => {
            let table: toml::Table = toml::from_str(fm_str)
                .map_err(|e| CoreError::frontmatter(source_id, e.to_string()))?;
            toml_to_yaml(toml::Value::Table(table))
        }
    };

    let metadata = match value {
        Value::Mapping(map) => map,
        Value::Null => Mapping::new(),
        other => {
            return Err(CoreError::frontmatter(
                source_id,
                format!("expected a mapping, found {}", yaml_kind(&other)),
            ));
        }
    };

    Ok(Frontmatter {
        metadata,
        body: body.to_string(),
    })
}

/// Convert a TOML value into the YAML value model.
///
/// TOML datetimes become their RFC 3339 string form.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(fm: &'a Frontmatter, key: &str) -> Option<&'a Value> {
        fm.metadata.get(Value::String(key.to_string()))
    }

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: "Hello World"
date: 2024-01-14
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = r#"+++
title = "Hello World"
+++

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title ="));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_dashes_inside_block_do_not_close_it() {
        let content = "---\ntitle: a---b\n---\nBody";
        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: a---b");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some content without frontmatter.";
        assert!(split_frontmatter(content).is_none());

        let fm = parse_frontmatter(content, "plain.md").expect("parse");
        assert!(fm.metadata.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let content = "---\ntitle: never closed\n";
        let fm = parse_frontmatter(content, "open.md").expect("parse");
        assert!(fm.metadata.is_empty());
        assert_eq!(fm.body, content);
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Test Post"
date: 2024-01-14
tags:
  - rust
  - test
cover: hero.png
---

Content here."#;

        let fm = parse_frontmatter(content, "test.md").expect("parse");

        assert_eq!(get(&fm, "title").and_then(Value::as_str), Some("Test Post"));
        assert_eq!(get(&fm, "date").and_then(Value::as_str), Some("2024-01-14"));
        assert_eq!(
            get(&fm, "tags").and_then(Value::as_sequence).map(Vec::len),
            Some(2)
        );
        assert_eq!(get(&fm, "cover").and_then(Value::as_str), Some("hero.png"));
        assert_eq!(fm.body, "Content here.");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "Test Post"
date = 2024-01-14
draft = true
tags = ["rust", "test"]
+++

Content here."#;

        let fm = parse_frontmatter(content, "test.md").expect("parse");

        assert_eq!(get(&fm, "title").and_then(Value::as_str), Some("Test Post"));
        assert_eq!(get(&fm, "date").and_then(Value::as_str), Some("2024-01-14"));
        assert_eq!(get(&fm, "draft").and_then(Value::as_bool), Some(true));
        assert_eq!(fm.body, "Content here.");
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let err = parse_frontmatter(content, "bad.md").unwrap_err();
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_scalar_frontmatter_is_error() {
        let content = "---\njust a string\n---\nBody";
        let err = parse_frontmatter(content, "scalar.md").unwrap_err();
        assert!(err.to_string().contains("expected a mapping"));
    }

    #[test]
    fn test_empty_block() {
        let fm = parse_frontmatter("---\n---\nBody", "empty.md").expect("parse");
        assert!(fm.metadata.is_empty());
        assert_eq!(fm.body, "Body");
    }
}
