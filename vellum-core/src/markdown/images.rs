//! Image reference rewriting and asset discovery.

use super::html_escape;
use crate::manifest::asset_url;
use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

/// Rewrites every image destination to an absolute, article-scoped asset URL
/// and records the original destination in document order. Emitted images
/// carry `loading="lazy"`.
///
/// Referenced files are not checked for existence here; a bad reference
/// surfaces later as a copy warning.
pub struct ImageTransformer<'a> {
    site_url: &'a str,
    article_id: &'a str,
}

impl<'a> ImageTransformer<'a> {
    pub fn new(site_url: &'a str, article_id: &'a str) -> Self {
        Self {
            site_url,
            article_id,
        }
    }

    /// Collect-and-rebuild pass over the event stream
    pub fn transform<'e>(&self, events: Vec<Event<'e>>) -> (Vec<Event<'e>>, Vec<String>) {
        let mut result = Vec::with_capacity(events.len());
        let mut assets = Vec::new();
        let mut pending: Option<PendingImage> = None;

        for event in events {
            match event {
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    assets.push(dest_url.to_string());
                    pending = Some(PendingImage {
                        src: asset_url(self.site_url, self.article_id, &dest_url),
                        alt: String::new(),
                        title: title.to_string(),
                    });
                }
                Event::End(TagEnd::Image) => {
                    if let Some(image) = pending.take() {
                        result.push(Event::InlineHtml(CowStr::Boxed(
                            image.into_tag().into_boxed_str(),
                        )));
                    }
                }
                Event::Text(text) | Event::Code(text) if pending.is_some() => {
                    if let Some(image) = pending.as_mut() {
                        image.alt.push_str(text.as_ref());
                    }
                }
                // Formatting inside alt text is dropped; only its text survives
                _ if pending.is_some() => {}
                other => result.push(other),
            }
        }

        (result, assets)
    }
}

struct PendingImage {
    src: String,
    alt: String,
    title: String,
}

impl PendingImage {
    fn into_tag(self) -> String {
        let mut tag = format!(
            "<img src=\"{}\" alt=\"{}\"",
            html_escape(&self.src),
            html_escape(&self.alt)
        );
        if !self.title.is_empty() {
            tag.push_str(&format!(" title=\"{}\"", html_escape(&self.title)));
        }
        tag.push_str(" loading=\"lazy\">");
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::Parser;

    fn transform(markdown: &str) -> (String, Vec<String>) {
        let events: Vec<Event> = Parser::new(markdown).collect();
        let transformer = ImageTransformer::new("https://example.com", "2024-01-10");
        let (events, assets) = transformer.transform(events);
        let mut html = String::new();
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        (html, assets)
    }

    #[test]
    fn test_rewrites_destination_and_adds_lazy_loading() {
        let (html, assets) = transform("![cover](cover.png)");
        assert_eq!(assets, vec!["cover.png"]);
        assert!(html.contains(
            "<img src=\"https://example.com/assets/2024-01-10/cover.png\" \
             alt=\"cover\" loading=\"lazy\">"
        ));
    }

    #[test]
    fn test_title_is_preserved() {
        let (html, _) = transform("![cover](cover.png \"The cover\")");
        assert!(html.contains("title=\"The cover\""));
    }

    #[test]
    fn test_duplicates_kept_in_document_order() {
        let (_, assets) = transform("![a](one.png)\n\n![b](two.png)\n\n![c](one.png)");
        assert_eq!(assets, vec!["one.png", "two.png", "one.png"]);
    }

    #[test]
    fn test_formatting_in_alt_text_is_flattened() {
        let (html, _) = transform("![a **bold** alt](pic.png)");
        assert!(html.contains("alt=\"a bold alt\""));
    }
}
