//! End-to-end tests for Folio.
//!
//! These tests build a small site from a configuration file and inspect the
//! output tree.

use std::{fs, path::Path};

use folio_generator::{BuildError, BuildOptions, PageKind, build_site};
use tempfile::TempDir;

const CONFIG: &str = r##"
[site]
title = "Field Notes"
base_url = "https://notes.example.com"
description = "Notes from the field"
author = "Sam"

[[navigation]]
label = "Home"
url = "/"

[[navigation]]
label = "About"
url = "/about/"

[content]
posts_per_page = 2
default_author = "Sam"

[paths]
content = "content"
templates = "templates"
output = "public"
"##;

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, text).expect("write");
}

fn sample_site(root: &Path) {
    write(&root.join("folio.toml"), CONFIG);

    let posts = root.join("content/posts");
    write(
        &posts.join("first-light.md"),
        "---\ntitle: First Light\ndate: 2024-01-05\ntags: [Astronomy, Gear]\n---\n\nThe sky cleared at dusk.",
    );
    write(
        &posts.join("second-night.md"),
        "---\ntitle: Second Night\ndate: 2024-02-10\ntags: [astronomy]\nsummary: Clouds again.\n---\n\nClouds rolled in.",
    );
    write(
        &posts.join("tools.md"),
        "---\ntitle: Tools\ndate: 2024-03-01\ntags: Gear, Notes\n---\n\n## Binoculars\n\nStill the best start.",
    );
    write(
        &posts.join("untitled-draft.md"),
        "---\ntitle: Not yet\ndate: 2024-04-01\ndraft: true\n---\n\nWork in progress.",
    );
    write(
        &posts.join("no-metadata.md"),
        "Just a body with no frontmatter at all.",
    );
    write(
        &root.join("content/about.md"),
        "---\ntitle: About\n---\n\nI look at the sky.",
    );
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn test_build_sample_site() {
    let dir = TempDir::new().expect("tempdir");
    sample_site(dir.path());

    let report = build_site(&BuildOptions::new(dir.path().join("folio.toml"))).expect("build");
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    assert!(report.core_pages_ok());
    assert_eq!(report.documents, 4);
    assert_eq!(report.tags, 3);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.source_id.contains("no-metadata")),
        "synthesized title and date are reported"
    );

    let out = dir.path().join("public");
    for file in [
        "index.html",
        "page/2/index.html",
        "posts/first-light/index.html",
        "posts/second-night/index.html",
        "posts/tools/index.html",
        "posts/no-metadata/index.html",
        "tags/index.html",
        "tags/astronomy/index.html",
        "tags/gear/index.html",
        "tags/notes/index.html",
        "about/index.html",
        "404.html",
        "sitemap.xml",
    ] {
        assert!(out.join(file).is_file(), "missing {file}");
    }
    assert!(!out.join("posts/untitled-draft/index.html").exists());

    let tools = read(&out.join("posts/tools/index.html"));
    assert!(tools.contains("<title>Tools | Field Notes</title>"));
    assert!(tools.contains("Binoculars"));
    assert!(tools.contains(r#"href="/tags/notes/""#));

    let astronomy = read(&out.join("tags/astronomy/index.html"));
    // Tags sharing a slug merge under the name seen first, newest document first.
    assert!(astronomy.contains("&ldquo;astronomy&rdquo;"));
    assert!(astronomy.contains("2 posts"));
    let second = astronomy.find("/posts/second-night/").expect("second");
    let first = astronomy.find("/posts/first-light/").expect("first");
    assert!(second < first);

    let about = read(&out.join("about/index.html"));
    assert!(about.contains(r#"<a href="/about/" class="active">About</a>"#));

    let sitemap = read(&out.join("sitemap.xml"));
    assert!(sitemap.contains("<loc>https://notes.example.com/posts/tools/</loc>"));
    assert!(sitemap.contains("<lastmod>2024-03-01</lastmod>"));
    assert!(sitemap.contains("<loc>https://notes.example.com/about/</loc>"));
}

#[test]
fn test_template_override() {
    let dir = TempDir::new().expect("tempdir");
    sample_site(dir.path());
    write(
        &dir.path().join("templates/post.html"),
        "<article data-id=\"{{id}}\">{{title}} by {{author}}</article>",
    );

    build_site(&BuildOptions::new(dir.path().join("folio.toml"))).expect("build");

    let html = read(&dir.path().join("public/posts/tools/index.html"));
    assert!(html.contains(r#"<article data-id="tools">Tools by Sam</article>"#));
    // Pages without an override keep the built-in layout.
    assert!(read(&dir.path().join("public/tags/index.html")).contains("tag-index"));
}

#[test]
fn test_output_override() {
    let dir = TempDir::new().expect("tempdir");
    sample_site(dir.path());
    let elsewhere = dir.path().join("elsewhere");

    let options = BuildOptions::new(dir.path().join("folio.toml")).with_output_dir(&elsewhere);
    build_site(&options).expect("build");

    assert!(elsewhere.join("index.html").is_file());
    assert!(!dir.path().join("public").exists());
}

#[test]
fn test_invalid_config_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir.path().join("folio.toml"), "[site]\ntitle = \"\"\nbase_url = \"https://x\"\n");
    let out = dir.path().join("public");

    let err = build_site(&BuildOptions::new(dir.path().join("folio.toml")).with_output_dir(&out))
        .expect_err("empty title");
    assert!(matches!(err, BuildError::Config(_)));
    assert!(read(&out.join("404.html")).contains("Page not found"));
}

#[test]
fn test_failed_page_type_does_not_stop_build() {
    let dir = TempDir::new().expect("tempdir");
    sample_site(dir.path());
    // The sitemap path is taken by a directory.
    fs::create_dir_all(dir.path().join("public/sitemap.xml")).expect("mkdir");

    let report = build_site(&BuildOptions::new(dir.path().join("folio.toml"))).expect("build");
    assert_eq!(report.failed, vec![PageKind::Sitemap]);
    assert!(report.core_pages_ok());
    assert!(dir.path().join("public/posts/tools/index.html").is_file());
}
