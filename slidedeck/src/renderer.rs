//! Markdown to HTML rendering for slides
//!
//! Relative image references are looked up through a caller-supplied
//! resolver. Each embedded image carries a `data-asset` attribute with its
//! logical path so the shell can open the image viewer when it is clicked.

use crate::assets::normalize_key;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Rendered slide body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedSlide {
    pub html: String,

    /// Logical paths of images that resolved through the asset lookup
    pub images: Vec<String>,

    /// Relative image references with no matching asset
    pub unresolved: Vec<String>,
}

/// Image being collected between `Start(Image)` and `End(Image)`
struct PendingImage<'a> {
    dest_url: CowStr<'a>,
    title: CowStr<'a>,
    alt: String,
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Render markup to HTML
///
/// # Parameters
/// * `markup` - Slide markup
/// * `resolve` - Maps a normalized logical path to a resource locator
///
/// # Returns
/// * `RenderedSlide` - HTML plus the image references seen while rendering
pub fn render_markdown<F>(markup: &str, resolve: F) -> RenderedSlide
where
    F: Fn(&str) -> Option<String>,
{
    let mut rendered = RenderedSlide::default();
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut pending: Option<PendingImage<'_>> = None;
    // Images may nest inside an image description; only the outermost one
    // produces a tag
    let mut depth = 0usize;

    for event in Parser::new_ext(markup, parser_options()) {
        match event {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) if pending.is_none() => {
                pending = Some(PendingImage {
                    dest_url,
                    title,
                    alt: String::new(),
                });
                depth = 1;
            }
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) if pending.is_some() => {
                depth -= 1;
                if depth == 0 {
                    if let Some(image) = pending.take() {
                        let tag = image_tag(&image, &resolve, &mut rendered);
                        events.push(Event::InlineHtml(tag.into()));
                    }
                }
            }
            Event::Text(text) | Event::Code(text) if pending.is_some() => {
                if let Some(ref mut image) = pending {
                    image.alt.push_str(&text);
                }
            }
            // Anything else nested in an image only contributes to alt text
            _ if pending.is_some() => {}
            other => events.push(other),
        }
    }

    html::push_html(&mut rendered.html, events.into_iter());
    rendered
}

fn image_tag<F>(image: &PendingImage<'_>, resolve: &F, rendered: &mut RenderedSlide) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let url = image.dest_url.as_ref();
    let mut attrs = String::new();

    if is_external(url) {
        attrs.push_str(&format!("src=\"{}\"", escape_html(url)));
    } else {
        let key = normalize_key(url);
        match resolve(&key) {
            Some(locator) => {
                attrs.push_str(&format!(
                    "src=\"{}\" data-asset=\"{}\"",
                    escape_html(&locator),
                    escape_html(&key)
                ));
                rendered.images.push(key);
            }
            None => {
                log::warn!("Image '{}' not found in asset library", url);
                attrs.push_str(&format!("src=\"{}\"", escape_html(url)));
                rendered.unresolved.push(key);
            }
        }
    }

    attrs.push_str(&format!(" alt=\"{}\"", escape_html(&image.alt)));
    if !image.title.is_empty() {
        attrs.push_str(&format!(" title=\"{}\"", escape_html(&image.title)));
    }
    format!("<img {}>", attrs)
}

/// URLs that are never looked up in the asset library
fn is_external(url: &str) -> bool {
    url.contains("://")
        || url.starts_with("data:")
        || url.starts_with("blob:")
        || url.starts_with("mailto:")
        || url.starts_with('/')
        || url.starts_with('#')
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_assets(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_render_heading_and_paragraph() {
        let rendered = render_markdown("# Title\n\nSome *text*", no_assets);
        assert!(rendered.html.contains("<h1>Title</h1>"));
        assert!(rendered.html.contains("<em>text</em>"));
        assert!(rendered.images.is_empty());
    }

    #[test]
    fn test_relative_image_resolved() {
        let rendered = render_markdown("![Logo](./img/logo.png \"Our logo\")", |key| {
            (key == "img/logo.png").then(|| "data:image/png;base64,AAAA".to_string())
        });
        assert!(rendered
            .html
            .contains("src=\"data:image/png;base64,AAAA\" data-asset=\"img/logo.png\""));
        assert!(rendered.html.contains("alt=\"Logo\""));
        assert!(rendered.html.contains("title=\"Our logo\""));
        assert_eq!(rendered.images, vec!["img/logo.png"]);
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_unresolved_image_keeps_url() {
        let rendered = render_markdown("![x](missing.png)", no_assets);
        assert!(rendered.html.contains("src=\"missing.png\""));
        assert!(!rendered.html.contains("data-asset"));
        assert_eq!(rendered.unresolved, vec!["missing.png"]);
    }

    #[test]
    fn test_external_image_untouched() {
        let rendered = render_markdown("![x](https://example.com/a.png)", |_| {
            panic!("external URLs must not be resolved")
        });
        assert!(rendered.html.contains("src=\"https://example.com/a.png\""));
        assert!(rendered.images.is_empty());
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_alt_text_with_formatting() {
        let rendered = render_markdown("![a *b* `c`](p.png)", |_| Some("u".to_string()));
        assert!(rendered.html.contains("alt=\"a b c\""));
    }

    #[test]
    fn test_nested_image_yields_single_tag() {
        let rendered = render_markdown("![a ![b](x.png)](y.png) after", |key| {
            (key == "y.png").then(|| "data:image/png;base64,BBBB".to_string())
        });
        assert_eq!(rendered.html.matches("<img").count(), 1);
        assert!(rendered.html.contains("data-asset=\"y.png\""));
        assert!(rendered.html.contains("alt=\"a b\""));
        assert!(rendered.html.contains(" after</p>"));
        assert_eq!(rendered.images, vec!["y.png"]);
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn test_code_block_hash_is_text() {
        let rendered = render_markdown("```\n# not a heading\n```", no_assets);
        assert!(rendered.html.contains("<pre><code># not a heading"));
    }

    #[test]
    fn test_table_extension_enabled() {
        let rendered = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |", no_assets);
        assert!(rendered.html.contains("<table>"));
    }
}
