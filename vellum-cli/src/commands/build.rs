//! Build command implementation: the materialize and publish stages on top
//! of the core build plan.

use anyhow::{Context, Result};
use askama::Template;
use std::fs;
use std::path::Path;
use vellum_core::{
    sitemap, structured_data, BlogBuilder, BuildPlan, Config, Publisher, RenderedArticle,
};
use vellum_render::ArticleTemplate;

/// Human-readable publish date shown in the article byline
const DISPLAY_DATE: &str = "%-d.%m.%Y";
const ISO_DATE: &str = "%Y-%m-%d";

/// Run one full build: prepare, materialize, publish, sitemap.
///
/// Every file of the new version is on disk before the pointer moves, and
/// the previous tree is deleted only after it has.
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;

    if !config.production {
        tracing::info!("You are running in development mode");
    }

    let builder = BlogBuilder::new(config.clone());
    let plan = builder.prepare().context("Failed to prepare build")?;

    let publisher = Publisher::new(config.output_dir());
    let staging = publisher.staging_dir(&plan.version);
    fs::create_dir_all(&staging).with_context(|| format!("Failed to create {:?}", staging))?;

    for rendered in &plan.articles {
        copy_article_assets(&config, rendered);
        render_article_page(&config, &plan, rendered, &staging)?;
    }

    let previous = publisher
        .commit(&plan.version)
        .context("Failed to update version pointer")?;
    if let Some(old) = previous {
        publisher
            .clean_up(&old)
            .context("Failed to remove previous version")?;
        tracing::info!("Old version removed: {}", old);
    }

    let metas: Vec<_> = plan.articles.iter().map(|r| r.article.clone()).collect();
    let sitemap_path = config.output_dir().join("sitemap.xml");
    fs::write(&sitemap_path, sitemap::render(&metas, &config.site_url()))
        .with_context(|| format!("Failed to write {:?}", sitemap_path))?;
    tracing::info!("Sitemap created");

    tracing::info!("Build complete, version {}", plan.version);
    Ok(())
}

/// Copy an article's referenced assets into the shared assets tree.
///
/// Failures here are warnings: the article is still published, possibly
/// with broken images.
fn copy_article_assets(config: &Config, rendered: &RenderedArticle) {
    let article = &rendered.article;
    let source_dir = config.article_assets_dir(&article.id);
    let dest_dir = config.output_dir().join("assets").join(&article.id);

    if let Err(err) = fs::create_dir_all(&dest_dir) {
        tracing::warn!("Failed to create {:?}: {}", dest_dir, err);
        return;
    }

    for file in &rendered.assets {
        let from = source_dir.join(file);
        let to = dest_dir.join(file);
        if let Err(err) = fs::copy(&from, &to) {
            tracing::warn!("Failed to copy {:?}: {}", from, err);
        }
    }
}

/// Render one article page into the staging tree
fn render_article_page(
    config: &Config,
    plan: &BuildPlan,
    rendered: &RenderedArticle,
    staging: &Path,
) -> Result<()> {
    let article = &rendered.article;
    let site_url = config.site_url();

    let ld = structured_data::script_tag(article, &site_url)
        .context("Failed to serialize structured data")?;

    let template = ArticleTemplate {
        title: article.title.clone(),
        lead: article.lead.clone(),
        author: article.author.clone(),
        published: article.published.format(DISPLAY_DATE).to_string(),
        created_at: article.published.format(ISO_DATE).to_string(),
        updated_at: article.updated.format(ISO_DATE).to_string(),
        base_url: site_url.clone(),
        canonical_url: article.canonical_url(&site_url),
        image_url: article.image_url(&site_url),
        content: rendered.html.clone(),
        ld,
        head: plan.head.clone(),
        bundle_tags: plan.bundle.tags.clone(),
    };

    let html = template
        .render()
        .context("Failed to render article template")?;

    let dir = staging.join(&article.slug);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let output_path = dir.join("index.html");
    fs::write(&output_path, html).with_context(|| format!("Failed to write {:?}", output_path))?;

    tracing::debug!("Rendered: {}", article.slug);

    Ok(())
}
