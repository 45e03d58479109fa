//! Article manifest loading and validation.

use crate::slug::slugify;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Date format used for article ids and updated fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Article '{id}': {field} is not a valid date: {source}")]
    Date {
        id: String,
        field: &'static str,
        source: chrono::ParseError,
    },

    #[error("Article '{id}': updated date {updated} precedes publish date {published}")]
    UpdatedBeforePublished {
        id: String,
        published: NaiveDate,
        updated: NaiveDate,
    },

    #[error("Article '{id}': slug '{slug}' is not URL-safe")]
    InvalidSlug { id: String, slug: String },

    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),
}

/// One manifest record as stored in blog.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub lead: String,
    pub author: String,
    pub image: String,
    pub updated: String,
}

/// A validated article: dates are parsed once here, so later pipeline
/// stages cannot fail on them.
#[derive(Debug, Clone)]
pub struct Article {
    /// Stable string key; doubles as the publish date
    pub id: String,
    pub slug: String,
    pub title: String,
    pub lead: String,
    pub author: String,
    /// Hero image filename inside the article's source directory
    pub image: String,
    pub published: NaiveDate,
    pub updated: NaiveDate,
}

impl Article {
    /// Canonical URL of the article page
    pub fn canonical_url(&self, site_url: &str) -> String {
        format!("{}/blog/{}/", site_url.trim_end_matches('/'), self.slug)
    }

    /// Canonical URL of the hero image
    pub fn image_url(&self, site_url: &str) -> String {
        asset_url(site_url, &self.id, &self.image)
    }
}

/// Absolute URL for an article-scoped asset.
///
/// Asset URLs carry no version segment; the copy destination and the
/// `/assets` serving route live outside the versioned trees.
pub fn asset_url(site_url: &str, article_id: &str, file: &str) -> String {
    format!(
        "{}/assets/{}/{}",
        site_url.trim_end_matches('/'),
        article_id,
        file
    )
}

/// An article together with its rendered body and discovered assets.
/// Constructed fresh per build run and discarded after files are written.
#[derive(Debug, Clone)]
pub struct RenderedArticle {
    pub article: Article,
    pub html: String,
    /// Referenced local asset filenames, in document order
    pub assets: Vec<String>,
}

/// Load and validate the manifest file
pub fn load(path: &Path) -> Result<Vec<Article>, ManifestError> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

/// Parse and validate manifest JSON
pub fn parse(raw: &str) -> Result<Vec<Article>, ManifestError> {
    let records: Vec<ArticleRecord> = serde_json::from_str(raw)?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut articles = Vec::with_capacity(records.len());
    for record in records {
        let article = validate(record)?;
        if !seen.insert(article.slug.clone()) {
            return Err(ManifestError::DuplicateSlug(article.slug));
        }
        articles.push(article);
    }

    Ok(articles)
}

fn validate(record: ArticleRecord) -> Result<Article, ManifestError> {
    let published =
        NaiveDate::parse_from_str(&record.id, DATE_FORMAT).map_err(|source| ManifestError::Date {
            id: record.id.clone(),
            field: "id",
            source,
        })?;

    let updated = NaiveDate::parse_from_str(&record.updated, DATE_FORMAT).map_err(|source| {
        ManifestError::Date {
            id: record.id.clone(),
            field: "updated",
            source,
        }
    })?;

    if updated < published {
        return Err(ManifestError::UpdatedBeforePublished {
            id: record.id,
            published,
            updated,
        });
    }

    if record.slug.is_empty() || record.slug != slugify(&record.slug) {
        return Err(ManifestError::InvalidSlug {
            id: record.id,
            slug: record.slug,
        });
    }

    Ok(Article {
        id: record.id,
        slug: record.slug,
        title: record.title,
        lead: record.lead,
        author: record.author,
        image: record.image,
        published,
        updated,
    })
}
