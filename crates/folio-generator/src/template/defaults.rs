//! Built-in templates, used when the project does not override them.

/// Names of every built-in template.
pub const BUILTIN_NAMES: &[&str] = &[
    "base",
    "post",
    "post-item",
    "list",
    "tag",
    "tags",
    "page",
    "404",
];

/// Look up a built-in template by name.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        "base" => Some(DEFAULT_BASE_TEMPLATE),
        "post" => Some(DEFAULT_POST_TEMPLATE),
        "post-item" => Some(DEFAULT_POST_ITEM_TEMPLATE),
        "list" => Some(DEFAULT_LIST_TEMPLATE),
        "tag" => Some(DEFAULT_TAG_TEMPLATE),
        "tags" => Some(DEFAULT_TAGS_TEMPLATE),
        "page" => Some(DEFAULT_PAGE_TEMPLATE),
        "404" => Some(DEFAULT_NOT_FOUND_TEMPLATE),
        _ => None,
    }
}

/// Default base HTML template.
pub const DEFAULT_BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{site.language}}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{#if page.is_home}}{{site.title}}{{else}}{{page.title}} | {{site.title}}{{/if}}</title>
    {{#if page.description}}<meta name="description" content="{{page.description}}">{{/if}}
    {{#if site.author}}<meta name="author" content="{{site.author}}">{{/if}}
    <link rel="canonical" href="{{page.canonical_url}}">
    <style>
        :root {
            --color-accent: {{#if appearance.accent}}{{appearance.accent}}{{else}}#3b82f6{{/if}};
            --color-bg: {{#if appearance.background}}{{appearance.background}}{{else}}#f8fafc{{/if}};
            --color-text: {{#if appearance.text}}{{appearance.text}}{{else}}#1e293b{{/if}};
            --color-muted: #64748b;
            --color-border: #e2e8f0;
            --font-body: {{#if appearance.font}}{{appearance.font}}{{else}}system-ui, -apple-system, sans-serif{{/if}};
        }

        *, *::before, *::after { box-sizing: border-box; }

        body {
            margin: 0;
            font-family: var(--font-body);
            line-height: 1.7;
            color: var(--color-text);
            background-color: var(--color-bg);
        }

        .container {
            max-width: 720px;
            margin: 0 auto;
            padding: 0 1.5rem;
        }

        header nav {
            display: flex;
            align-items: center;
            justify-content: space-between;
            padding: 1rem 0;
            border-bottom: 1px solid var(--color-border);
        }

        .site-title { font-weight: 600; color: var(--color-text); text-decoration: none; }
        .nav-links { display: flex; gap: 1.5rem; list-style: none; margin: 0; padding: 0; }
        .nav-links a { color: var(--color-muted); text-decoration: none; }
        .nav-links a.active, .nav-links a:hover { color: var(--color-accent); }

        main { padding: 2rem 0 4rem; }
        a { color: var(--color-accent); }

        .post-list ul { list-style: none; padding: 0; }
        .post-item { padding: 1.25rem 0; border-bottom: 1px solid var(--color-border); }
        .post-item time, .post-meta { color: var(--color-muted); font-size: 0.875rem; }
        .post-meta span + span::before { content: " · "; }

        .tags { display: flex; flex-wrap: wrap; gap: 0.5rem; list-style: none; padding: 0; }
        .tags a { font-size: 0.8rem; text-decoration: none; }

        .pagination { display: flex; gap: 0.5rem; justify-content: center; margin-top: 2rem; }
        .pagination .current { font-weight: 600; }

        footer {
            padding: 2rem 0;
            color: var(--color-muted);
            font-size: 0.875rem;
            border-top: 1px solid var(--color-border);
        }
    </style>
</head>
<body>
    <header>
        <nav class="container">
            <a href="/" class="site-title">{{site.title}}</a>
            {{#if navigation}}<ul class="nav-links">
                {{#each navigation}}<li><a href="{{url}}"{{#if active}} class="active"{{/if}}>{{label}}</a></li>
                {{/each}}
            </ul>{{/if}}
        </nav>
    </header>
    <main class="container">
        {{content}}
    </main>
    <footer>
        <div class="container">&copy; {{year}} {{site.title}}{{#if site.author}} &middot; {{site.author}}{{/if}}</div>
    </footer>
</body>
</html>"##;

/// Default document page body.
pub const DEFAULT_POST_TEMPLATE: &str = r#"<article class="post">
    <header>
        <h1>{{title}}</h1>
        <p class="post-meta">
            <span><time datetime="{{date}}">{{formatted_date}}</time></span>
            <span class="author">{{author}}</span>
            {{#if show_reading_time}}<span class="reading-time">{{reading_time}} min read</span>{{/if}}
        </p>
        {{#if tags}}<ul class="tags">
            {{#each tags}}<li><a href="{{url}}" rel="tag">#{{name}}</a></li>{{/each}}
        </ul>{{/if}}
    </header>
    <div class="content">
        {{content}}
    </div>
</article>"#;

/// Default listing entry, rendered once per document.
pub const DEFAULT_POST_ITEM_TEMPLATE: &str = r#"<li class="post-item">
    <a href="{{url}}"><h2>{{title}}</h2></a>
    <time datetime="{{date}}">{{formatted_date}}</time>{{#if show_reading_time}} &middot; {{reading_time}} min read{{/if}}
    <p class="post-summary">{{#if summary}}{{summary}}{{else}}{{excerpt}}{{/if}}</p>
</li>"#;

/// Default listing page with pagination.
pub const DEFAULT_LIST_TEMPLATE: &str = r#"<section class="post-list">
    {{#if is_first_page}}{{#if site.description}}<p class="site-description">{{site.description}}</p>{{/if}}{{else}}<h1>Page {{pagination.current_page}}</h1>{{/if}}
    {{#if items}}<ul>
        {{items}}
    </ul>{{else}}<p class="empty">Nothing published yet.</p>{{/if}}
    {{#if pagination.has_pages}}<nav class="pagination">
        {{#if pagination.has_prev}}<a href="{{pagination.prev_url}}" rel="prev">&larr; Newer</a>{{/if}}
        {{#if pagination.show_first}}<a href="{{pagination.first_url}}">1</a>{{/if}}
        {{#if pagination.show_first_ellipsis}}<span class="ellipsis">&hellip;</span>{{/if}}
        {{#each pagination.pages}}{{#if is_current}}<span class="current">{{number}}</span>{{else}}<a href="{{url}}">{{number}}</a>{{/if}}{{/each}}
        {{#if pagination.show_last_ellipsis}}<span class="ellipsis">&hellip;</span>{{/if}}
        {{#if pagination.show_last}}<a href="{{pagination.last_url}}">{{pagination.total_pages}}</a>{{/if}}
        {{#if pagination.has_next}}<a href="{{pagination.next_url}}" rel="next">Older &rarr;</a>{{/if}}
    </nav>{{/if}}
</section>"#;

/// Default page for a single tag.
pub const DEFAULT_TAG_TEMPLATE: &str = r#"<section class="post-list tag-page">
    <h1>Tagged &ldquo;{{tag.name}}&rdquo;</h1>
    <p class="tag-count">{{tag.count}} {{#if tag.count == 1}}post{{else}}posts{{/if}}</p>
    <ul>
        {{items}}
    </ul>
    <p><a href="/tags/">All tags</a></p>
</section>"#;

/// Default index of all tags.
pub const DEFAULT_TAGS_TEMPLATE: &str = r#"<section class="tag-index">
    <h1>Tags</h1>
    {{#if tags}}<ul class="tags">
        {{#each tags}}<li><a href="{{url}}">{{name}}</a> <span class="count">({{count}})</span></li>{{/each}}
    </ul>{{else}}<p class="empty">No tags yet.</p>{{/if}}
</section>"#;

/// Default standalone page (about).
pub const DEFAULT_PAGE_TEMPLATE: &str = r#"<article class="page">
    <h1>{{title}}</h1>
    <div class="content">
        {{content}}
    </div>
</article>"#;

/// Default error page body.
pub const DEFAULT_NOT_FOUND_TEMPLATE: &str = r#"<section class="error-page">
    <h1>{{title}}</h1>
    <p>{{message}}</p>
    <p><a href="/">Back to the home page</a></p>
</section>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse::{Node, parse};

    fn has_literal_braces(nodes: &[Node]) -> bool {
        nodes.iter().any(|node| match node {
            Node::Text(text) => text.contains("{{"),
            Node::Var(_) => false,
            Node::Each { body, .. } => has_literal_braces(body),
            Node::If {
                then_branch,
                else_branch,
                ..
            } => has_literal_braces(then_branch) || has_literal_braces(else_branch),
        })
    }

    #[test]
    fn test_every_builtin_resolves() {
        for name in BUILTIN_NAMES {
            assert!(builtin(name).is_some(), "missing built-in {name}");
        }
        assert!(builtin("nope").is_none());
    }

    #[test]
    fn test_builtins_are_well_formed() {
        for name in BUILTIN_NAMES {
            let nodes = parse(builtin(name).expect("builtin"));
            assert!(!has_literal_braces(&nodes), "malformed directive in {name}");
        }
    }
}
