//! Slide segmentation
//!
//! Turns an ordered list of documents into an ordered list of slides by
//! splitting the concatenated text before every level-1 or level-2 heading.
//! Level-3+ headings stay inside the slide they appear in.

use crate::document::Document;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Separator inserted between consecutive documents
///
/// Keeps a document's trailing text off the line holding the next
/// document's leading heading.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// A line starting with exactly one or two `#` followed by a space
static SLIDE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,2} ").expect("slide heading pattern is a valid regex")
});

/// Split documents into slide strings
///
/// Each slide keeps the heading line that starts it. Trailing whitespace
/// (including the document separator) is trimmed from every slide and
/// whitespace-only segments are dropped.
///
/// # Parameters
/// * `documents` - Documents in presentation order
///
/// # Returns
/// * `Vec<String>` - Slides in presentation order (empty if all content is blank)
pub fn segment_slides(documents: &[Document]) -> Vec<String> {
    let text = documents.iter().map(|d| d.content.as_str()).join(DOCUMENT_SEPARATOR);
    segment_text(&text)
}

/// Split already concatenated text into slide strings
pub fn segment_text(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let boundaries = std::iter::once(0)
        .chain(SLIDE_HEADING.find_iter(text).map(|m| m.start()))
        .chain(std::iter::once(text.len()))
        .dedup();

    let slides: Vec<String> = boundaries
        .tuple_windows()
        .map(|(start, end)| text[start..end].trim_end())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    if slides.is_empty() {
        // No heading structure at all: the whole text is one slide
        return vec![text.trim_end().to_string()];
    }

    log::debug!("Segmented {} bytes into {} slides", text.len(), slides.len());
    slides
}

/// How a slide is styled by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    /// Starts with a level-1 heading
    Title,
    /// Anything else
    Content,
}

impl SlideKind {
    /// Classify slide content
    ///
    /// Title iff the content, after trimming leading whitespace, starts with
    /// a single `#` followed by a space.
    pub fn classify(content: &str) -> Self {
        if content.trim_start().starts_with("# ") {
            SlideKind::Title
        } else {
            SlideKind::Content
        }
    }
}

/// A segmented slide with its position in the deck
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Zero-based position in the deck
    pub index: usize,

    /// Raw markup of the slide, heading line included
    pub content: String,
}

impl Slide {
    pub fn kind(&self) -> SlideKind {
        SlideKind::classify(&self.content)
    }

    pub fn is_title(&self) -> bool {
        self.kind() == SlideKind::Title
    }

    /// Heading text of the slide's first line, if it is a heading
    pub fn heading(&self) -> Option<&str> {
        let first_line = self.content.trim_start().lines().next()?;
        let text = first_line.trim_start_matches('#');
        if text.len() == first_line.len() || !text.starts_with(' ') {
            return None;
        }
        Some(text.trim())
    }
}

/// Segment documents into indexed slides
pub fn build_slides(documents: &[Document]) -> Vec<Slide> {
    segment_slides(documents)
        .into_iter()
        .enumerate()
        .map(|(index, content)| Slide { index, content })
        .collect()
}
