//! Askama template definitions.

use askama::Template;

/// Article page template.
///
/// `content`, `ld`, `head`, and `bundle_tags` arrive pre-rendered and pass
/// through the `safe` filter; everything else is escaped by askama.
#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub title: String,
    pub lead: String,
    pub author: String,

    /// Human-readable publish date for the byline
    pub published: String,

    /// ISO publish date for the `datetime` attribute
    pub created_at: String,

    /// ISO last-updated date
    pub updated_at: String,

    /// Site base URL (home link)
    pub base_url: String,

    /// Canonical URL of this article
    pub canonical_url: String,

    /// Canonical URL of the hero image
    pub image_url: String,

    /// Rendered article body
    pub content: String,

    /// ld+json structured-data script tag
    pub ld: String,

    /// Accumulated head fragment (highlight stylesheet)
    pub head: String,

    /// Stylesheet bundle tags (hashed link or dev-server scripts)
    pub bundle_tags: String,
}
