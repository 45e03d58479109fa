//! Init command implementation.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"site:
  url: "http://127.0.0.1:8080"
production: false
paths:
  articles: "blog"
  output: "dist"
server:
  port: 8080
"#;

const SAMPLE_ID: &str = "2024-01-10";

/// Initialize a new vellum project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_blog(root)?;

    println!("✓ vellum initialized in {:?}", root);
    println!("  - Edit vellum.yml to set the site URL");
    println!("  - Add articles to blog/blog.json and write them under blog/<id>/index.md");
    println!("  - Run `vellum build`, then `vellum serve`");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("vellum.yml");
    if config_path.exists() {
        println!("vellum.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_blog(root: &Path) -> Result<()> {
    let blog_dir = root.join("blog");
    let article_dir = blog_dir.join(SAMPLE_ID);
    fs::create_dir_all(&article_dir)
        .with_context(|| format!("Failed to create {:?}", article_dir))?;

    let manifest_path = blog_dir.join("blog.json");
    if !manifest_path.exists() {
        fs::write(&manifest_path, sample_manifest())
            .with_context(|| format!("Failed to write {:?}", manifest_path))?;
        println!("Created {:?}", manifest_path);
    }

    let sample = article_dir.join("index.md");
    if !sample.exists() {
        fs::write(&sample, sample_article())
            .with_context(|| format!("Failed to write {:?}", sample))?;
        println!("Created {:?}", sample);
    }

    Ok(())
}

fn sample_manifest() -> String {
    format!(
        r#"[
    {{
        "id": "{id}",
        "slug": "welcome",
        "title": "Welcome to vellum",
        "lead": "A first article to build on",
        "author": "You",
        "image": "cover.png",
        "updated": "{id}"
    }}
]
"#,
        id = SAMPLE_ID
    )
}

fn sample_article() -> String {
    r#"# Welcome

This is your first article. Images next to this file are copied into the
published assets tree:

![cover](cover.png)

Fenced code blocks are highlighted:

```rust
fn main() {
    println!("hello, vellum");
}
```
"#
    .to_string()
}
