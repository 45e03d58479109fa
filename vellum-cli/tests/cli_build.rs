use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const CONFIG: &str = r#"
site:
  url: "https://example.com"
production: false
paths:
  articles: "blog"
  output: "dist"
"#;

const MANIFEST: &str = r#"[
  {
    "id": "2024-01-10",
    "slug": "hello",
    "title": "Hello",
    "lead": "First post",
    "author": "A",
    "image": "cover.png",
    "updated": "2024-01-11"
  }
]"#;

const ARTICLE: &str = "# Hello\n\n![cover](cover.png)\n\n```go\npackage main\n```\n";

fn write_project(root: &Path) {
    fs::write(root.join("vellum.yml"), CONFIG).unwrap();

    let article_dir = root.join("blog/2024-01-10");
    fs::create_dir_all(&article_dir).unwrap();
    fs::write(root.join("blog/blog.json"), MANIFEST).unwrap();
    fs::write(article_dir.join("index.md"), ARTICLE).unwrap();
    fs::write(article_dir.join("cover.png"), b"not a real png").unwrap();
}

fn run_build(root: &Path) {
    #[allow(deprecated)]
    Command::cargo_bin("vellum")
        .unwrap()
        .current_dir(root)
        .arg("build")
        .assert()
        .success();
}

fn current_version(root: &Path) -> String {
    fs::read_to_string(root.join("dist/version"))
        .unwrap()
        .trim()
        .to_string()
}

#[test]
fn build_publishes_versioned_tree() {
    let dir = tempdir().unwrap();
    write_project(dir.path());

    run_build(dir.path());

    let version = current_version(dir.path());
    let page = dir
        .path()
        .join("dist")
        .join(&version)
        .join("hello/index.html");
    let html = fs::read_to_string(&page).unwrap();
    assert!(!html.is_empty());

    // Image rewritten to the article-scoped asset URL, lazily loaded
    assert!(html.contains("src=\"https://example.com/assets/2024-01-10/cover.png\""));
    assert!(html.contains("loading=\"lazy\""));

    // Highlighted code block with class-based markup
    assert!(html.contains("<pre class=\"highlight\">"));
    assert!(html.contains("<span class="));
    assert!(html.contains("<style>"));

    // Structured data and canonical URL
    assert!(html.contains("application/ld+json"));
    assert!(html.contains("https://example.com/blog/hello/"));

    // Asset copied next to the versioned trees, not inside them
    assert!(dir
        .path()
        .join("dist/assets/2024-01-10/cover.png")
        .exists());
}

#[test]
fn rebuild_swaps_version_and_removes_previous_tree() {
    let dir = tempdir().unwrap();
    write_project(dir.path());

    run_build(dir.path());
    let first = current_version(dir.path());
    let first_body = fs::read_to_string(
        dir.path()
            .join("dist")
            .join(&first)
            .join("hello/index.html"),
    )
    .unwrap();

    run_build(dir.path());
    let second = current_version(dir.path());

    assert_ne!(first, second);
    assert!(!dir.path().join("dist").join(&first).exists());

    // Pointer names a complete tree holding every manifest article
    let second_page = dir
        .path()
        .join("dist")
        .join(&second)
        .join("hello/index.html");
    assert!(second_page.exists());

    // Identical inputs produce identical rendered bodies
    let second_body = fs::read_to_string(&second_page).unwrap();
    assert_eq!(first_body, second_body);
}

#[test]
fn malformed_id_aborts_before_any_output() {
    let dir = tempdir().unwrap();
    write_project(dir.path());
    fs::write(
        dir.path().join("blog/blog.json"),
        MANIFEST.replace("2024-01-10", "not-a-date"),
    )
    .unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("vellum")
        .unwrap()
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid date"));

    assert!(!dir.path().join("dist/version").exists());
}

#[test]
fn missing_asset_degrades_with_warning() {
    let dir = tempdir().unwrap();
    write_project(dir.path());
    fs::remove_file(dir.path().join("blog/2024-01-10/cover.png")).unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("vellum")
        .unwrap()
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to copy"));

    // Article still published
    let version = current_version(dir.path());
    assert!(dir
        .path()
        .join("dist")
        .join(&version)
        .join("hello/index.html")
        .exists());
}

#[test]
fn sitemap_lists_article_urls() {
    let dir = tempdir().unwrap();
    write_project(dir.path());

    run_build(dir.path());

    let sitemap = fs::read_to_string(dir.path().join("dist/sitemap.xml")).unwrap();
    assert_eq!(sitemap.matches("<url>").count(), 1);
    assert!(sitemap.contains("<loc>https://example.com/blog/hello/</loc>"));
    assert!(sitemap.contains("<lastmod>2024-01-11</lastmod>"));
}

#[test]
fn missing_article_source_is_fatal() {
    let dir = tempdir().unwrap();
    write_project(dir.path());
    fs::remove_file(dir.path().join("blog/2024-01-10/index.md")).unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("vellum")
        .unwrap()
        .current_dir(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("2024-01-10"));
}

#[test]
fn init_scaffolds_a_buildable_project() {
    let dir = tempdir().unwrap();

    #[allow(deprecated)]
    Command::cargo_bin("vellum")
        .unwrap()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    assert!(dir.path().join("vellum.yml").exists());
    assert!(dir.path().join("blog/blog.json").exists());

    run_build(dir.path());
    let version = current_version(dir.path());
    assert!(dir
        .path()
        .join("dist")
        .join(&version)
        .join("welcome/index.html")
        .exists());
}
