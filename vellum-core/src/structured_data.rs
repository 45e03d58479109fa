//! schema.org structured-data block embedded in each article page.

use crate::manifest::{Article, DATE_FORMAT};
use serde::Serialize;

const SCHEMA_CONTEXT: &str = "https://schema.org";

#[derive(Serialize)]
struct ArticleSchema<'a> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    schema_type: &'static str,
    #[serde(rename = "mainEntityOfPage")]
    main_entity: Entity,
    headline: &'a str,
    description: &'a str,
    image: String,
    author: Author<'a>,
    #[serde(rename = "datePublished")]
    date_published: String,
    #[serde(rename = "dateModified")]
    date_modified: String,
}

#[derive(Serialize)]
struct Entity {
    #[serde(rename = "@type")]
    schema_type: &'static str,
    #[serde(rename = "@id")]
    id: String,
}

#[derive(Serialize)]
struct Author<'a> {
    #[serde(rename = "@type")]
    schema_type: &'static str,
    name: &'a str,
    url: &'a str,
}

/// Render the ld+json script tag for one article
pub fn script_tag(article: &Article, site_url: &str) -> Result<String, serde_json::Error> {
    let schema = ArticleSchema {
        context: SCHEMA_CONTEXT,
        schema_type: "Article",
        main_entity: Entity {
            schema_type: "WebPage",
            id: article.canonical_url(site_url),
        },
        headline: &article.title,
        description: &article.lead,
        image: article.image_url(site_url),
        author: Author {
            schema_type: "Person",
            name: &article.author,
            url: site_url,
        },
        date_published: article.published.format(DATE_FORMAT).to_string(),
        date_modified: article.updated.format(DATE_FORMAT).to_string(),
    };

    let json = serde_json::to_string(&schema)?;
    Ok(format!(
        r#"<script type="application/ld+json">{}</script>"#,
        json
    ))
}
