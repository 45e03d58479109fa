//! Code syntax highlighting using syntect.

use super::html_escape;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Theme the shared stylesheet fragment is generated from
const THEME: &str = "InspiredGitHub";

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Failed to generate highlight stylesheet: {0}")]
    Stylesheet(#[from] syntect::Error),
}

/// Class-based code highlighter.
///
/// Construction emits the shared `<style>` fragment exactly once into the
/// page-head accumulator; per-block markup carries classes only, so every
/// block on a page references that single stylesheet.
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl Highlighter {
    pub fn new(head: &mut String) -> Result<Self, HighlightError> {
        let themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .get(THEME)
            .or_else(|| themes.themes.get("base16-ocean.light"))
            .unwrap();

        let css = css_for_theme_with_class_style(theme, CLASS_STYLE)?;
        head.push_str("<style>");
        head.push_str(&css);
        head.push_str("</style>");

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        })
    }

    /// Highlight one code block.
    ///
    /// Syntax resolution: explicit hint token, file-extension lookup,
    /// first-line detection, then the plain-text syntax. An unsupported
    /// language is never an error.
    pub fn highlight(&self, code: &str, hint: &str) -> Result<String, syntect::Error> {
        let token = hint
            .split([',', ' '])
            .next()
            .unwrap_or_default()
            .trim();

        let syntax = if token.is_empty() {
            None
        } else {
            self.syntaxes
                .find_syntax_by_token(token)
                .or_else(|| self.syntaxes.find_syntax_by_extension(token))
        };
        let syntax = syntax
            .or_else(|| {
                self.syntaxes
                    .find_syntax_by_first_line(code.lines().next().unwrap_or_default())
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(format!(
            "<pre class=\"highlight\"><code>{}</code></pre>\n",
            generator.finalize()
        ))
    }
}

/// Event pass replacing code blocks with highlighted markup.
///
/// A highlighting failure degrades to a plain escaped block; it never aborts
/// the build.
pub struct HighlightTransformer<'h> {
    highlighter: &'h Highlighter,
}

impl<'h> HighlightTransformer<'h> {
    pub fn new(highlighter: &'h Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn transform<'e>(&self, events: Vec<Event<'e>>) -> Vec<Event<'e>> {
        let mut result = Vec::with_capacity(events.len());
        // (language hint, accumulated literal) of the open code block
        let mut block: Option<(String, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let hint = match &kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    block = Some((hint, String::new()));
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, content)) = block.as_mut() {
                        content.push_str(text.as_ref());
                    }
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((hint, content)) = block.take() {
                        let markup = match self.highlighter.highlight(&content, &hint) {
                            Ok(markup) => markup,
                            Err(err) => {
                                tracing::warn!("Failed to highlight code block: {}", err);
                                format!("<pre><code>{}</code></pre>\n", html_escape(&content))
                            }
                        };
                        result.push(Event::Html(CowStr::Boxed(markup.into_boxed_str())));
                    }
                }
                other => result.push(other),
            }
        }

        result
    }
}
