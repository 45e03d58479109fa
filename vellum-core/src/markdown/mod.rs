//! Markdown processing pipeline with blog-specific transforms.

pub mod highlight;
pub mod images;

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

pub use highlight::{HighlightError, HighlightTransformer, Highlighter};
pub use images::ImageTransformer;

/// Result of transforming one article body
#[derive(Debug, Clone)]
pub struct TransformedBody {
    pub html: String,
    /// Referenced local asset filenames, in document order (duplicates kept)
    pub assets: Vec<String>,
}

/// Markdown processor with blog transforms
pub struct MarkdownProcessor {
    options: Options,
    highlighter: Highlighter,
}

impl MarkdownProcessor {
    pub fn new(highlighter: Highlighter) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            highlighter,
        }
    }

    /// Convert one article body to HTML.
    ///
    /// Image destinations are rewritten to absolute, article-scoped asset
    /// URLs and annotated for lazy loading; absolute links open in a new
    /// tab; headings get stable ids; code blocks are syntax highlighted.
    /// Every pass collects and re-emits events rather than mutating the
    /// stream in place.
    pub fn convert(&self, markdown: &str, article_id: &str, site_url: &str) -> TransformedBody {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();

        let heading_ids = collect_heading_ids(&events);
        let events = attach_heading_ids(events, &heading_ids);

        let image_transformer = ImageTransformer::new(site_url, article_id);
        let (events, assets) = image_transformer.transform(events);

        let events = retarget_external_links(events);

        let highlight_transformer = HighlightTransformer::new(&self.highlighter);
        let events = highlight_transformer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        TransformedBody {
            html: html_output,
            assets,
        }
    }
}

/// Derive an id for every heading, in document order, from its text
fn collect_heading_ids(events: &[Event]) -> Vec<String> {
    let mut ids = Vec::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                current = Some(String::new());
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = current.take() {
                    ids.push(slugify(&title));
                }
            }
            _ => {}
        }
    }

    ids
}

/// Inject derived ids into headings that carry no explicit one
fn attach_heading_ids<'a>(events: Vec<Event<'a>>, ids: &[String]) -> Vec<Event<'a>> {
    let mut id_iter = ids.iter();
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                mut id,
                classes,
                attrs,
            }) => {
                match id_iter.next() {
                    Some(derived) if id.is_none() && !derived.is_empty() => {
                        id = Some(CowStr::Boxed(derived.clone().into_boxed_str()));
                    }
                    _ => {}
                }
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            _ => result.push(event),
        }
    }

    result
}

/// Absolute links open in a new tab; relative and fragment links pass through
fn retarget_external_links(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut result = Vec::with_capacity(events.len());
    let mut rewriting = false;

    for event in events {
        match event {
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if is_absolute_url(&dest_url) => {
                let mut tag = format!("<a href=\"{}\"", html_escape(&dest_url));
                if !title.is_empty() {
                    tag.push_str(&format!(" title=\"{}\"", html_escape(&title)));
                }
                tag.push_str(" target=\"_blank\">");
                result.push(Event::InlineHtml(CowStr::Boxed(tag.into_boxed_str())));
                rewriting = true;
            }
            Event::End(TagEnd::Link) if rewriting => {
                result.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                rewriting = false;
            }
            other => result.push(other),
        }
    }

    result
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
