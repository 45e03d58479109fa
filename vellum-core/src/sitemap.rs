//! Sitemap rendering.

use crate::manifest::{Article, DATE_FORMAT};

const XMLNS: &str = "https://www.sitemaps.org/schemas/sitemap/0.9";
const CHANGE_FREQUENCY: &str = "monthly";
const PRIORITY: &str = "0.5";

/// Render the sitemap XML document for the manifest.
///
/// One `<url>` entry per article; writing the result is the caller's job.
pub fn render(articles: &[Article], site_url: &str) -> String {
    let mut urls = String::new();

    for article in articles {
        urls.push_str("\t<url>\n");
        urls.push_str(&format!(
            "\t\t<loc>{}</loc>\n",
            escape_xml(&article.canonical_url(site_url))
        ));
        urls.push_str(&format!(
            "\t\t<lastmod>{}</lastmod>\n",
            article.updated.format(DATE_FORMAT)
        ));
        urls.push_str(&format!("\t\t<priority>{}</priority>\n", PRIORITY));
        urls.push_str(&format!(
            "\t\t<changefreq>{}</changefreq>\n",
            CHANGE_FREQUENCY
        ));
        urls.push_str("\t</url>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{}\">\n{}</urlset>\n",
        XMLNS, urls
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(slug: &str) -> Article {
        Article {
            id: "2024-01-10".into(),
            slug: slug.into(),
            title: "Hello".into(),
            lead: "First post".into(),
            author: "A".into(),
            image: "cover.png".into(),
            published: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            updated: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
        }
    }

    #[test]
    fn test_one_entry_per_article() {
        let xml = render(&[article("hello")], "https://example.com");

        assert_eq!(xml.matches("<url>").count(), 1);
        assert!(xml.contains("<loc>https://example.com/blog/hello/</loc>"));
        assert!(xml.contains("<lastmod>2024-01-11</lastmod>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn test_empty_manifest_renders_empty_urlset() {
        let xml = render(&[], "https://example.com");
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }
}
