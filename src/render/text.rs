//! Offset-preserving plain text for SGML fragments.
//!
//! Header and markup are overwritten with spaces instead of being removed,
//! so the output has exactly as many characters as the input and any
//! character offset into the clean text is also an offset into the source.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::parser::DEFAULT_BODY_MARKER;

/// Any run from `<` to the next `>`, across line breaks.
const TAG_PATTERN: &str = r"<[^>]*>";

/// Builds blanked text from raw fragments.
///
/// # Example
///
/// ```
/// use tacdoc::render::TextBuilder;
///
/// let raw = "<DOC><DOCID>D1</DOCID><TEXT>Hello</TEXT></DOC>";
/// let text = TextBuilder::new().build(raw);
/// assert_eq!(text.len(), raw.len());
/// assert_eq!(text.trim(), "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct TextBuilder {
    head_regex: Regex,
    tag_regex: Regex,
}

impl TextBuilder {
    /// Create a builder using the `<TEXT>` body marker.
    pub fn new() -> Self {
        Self::with_body_marker(DEFAULT_BODY_MARKER)
    }

    /// Create a builder with another body marker.
    ///
    /// The marker is matched literally and case-sensitively.
    pub fn with_body_marker(marker: &str) -> Self {
        let head = format!(r"(?s)\A.*?{}", regex::escape(marker));
        Self {
            head_regex: Regex::new(&head).expect("escaped marker forms a valid pattern"),
            tag_regex: Regex::new(TAG_PATTERN).expect("tag pattern is valid"),
        }
    }

    /// Blank the header and every tag of `raw`.
    ///
    /// The header runs from the start of the fragment through the first body
    /// marker; without a marker nothing is treated as header.
    pub fn build(&self, raw: &str) -> String {
        let text = self.blank_header(raw);
        self.blank_tags(&text).into_owned()
    }

    /// Blank everything up to and including the first body marker.
    pub fn blank_header<'t>(&self, raw: &'t str) -> Cow<'t, str> {
        self.head_regex.replacen(raw, 1, blank_match)
    }

    /// Blank every tag.
    pub fn blank_tags<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.tag_regex.replace_all(text, blank_match)
    }
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Spaces, one per character of the match.
fn blank_match(caps: &Captures<'_>) -> String {
    blank(&caps[0])
}

/// Spaces, one per character of `s`.
pub fn blank(s: &str) -> String {
    " ".repeat(s.chars().count())
}
