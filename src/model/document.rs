//! Document-level types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Extracted field and attribute values, keyed by lower-case name.
pub type Attrs = BTreeMap<String, String>;

/// Number of text characters shown by `Display`.
const PREVIEW_CHARS: usize = 50;

/// One document of an SGML corpus.
///
/// `text` always has the same number of characters as `raw`: header and
/// markup regions are blanked with spaces rather than removed, so character
/// offsets computed against the clean text also address the source fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    text: String,
    raw: String,
    attrs: Attrs,
}

impl Document {
    /// Create a document from its parts.
    ///
    /// Callers outside this crate normally get documents from
    /// [`DocBuilder`](crate::parser::DocBuilder) or
    /// [`CorpusReader`](crate::corpus::CorpusReader).
    pub fn new(id: impl Into<String>, text: String, raw: String, attrs: Attrs) -> Self {
        debug_assert_eq!(text.chars().count(), raw.chars().count());
        Self {
            id: id.into(),
            text,
            raw,
            attrs,
        }
    }

    /// Document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Clean text with header and markup blanked.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Original fragment, `<DOC>` through `</DOC>`.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// All extracted fields and attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Look up one extracted field or attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Length of the text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Slice of the clean text between two character offsets, `[start, end)`.
    ///
    /// Returns `None` when the range is reversed or runs past the end.
    pub fn span(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let begin = char_to_byte(&self.text, start)?;
        let finish = char_to_byte(&self.text, end)?;
        Some(&self.text[begin..finish])
    }
}

/// Byte index of the `n`th character, or the string length for `n == len`.
fn char_to_byte(s: &str, n: usize) -> Option<usize> {
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .nth(n)
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let collapsed = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
        let preview: String = collapsed.chars().take(PREVIEW_CHARS).collect();
        write!(f, "Document<{}..>", preview)
    }
}
