//! Annotation query records.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Document;

/// A labelled character span inside one document.
///
/// `start` and `end` are character offsets into [`Document::text`], with
/// `end` exclusive. `doc_id` is matched against [`Document::id`] by the
/// consumer; nothing checks that the document exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Query identifier, unique within its file
    pub id: String,
    /// Identifier of the referenced document
    pub doc_id: String,
    /// Begin offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
    /// Label of the span
    pub name: String,
}

impl Query {
    /// Number of characters covered by the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of the span in `doc`, if `doc` is the referenced document and
    /// the span fits inside it.
    pub fn span_in<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        if doc.id() != self.doc_id {
            return None;
        }
        doc.span(self.start, self.end)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Query<{}: {}>", self.id, self.name)
    }
}
