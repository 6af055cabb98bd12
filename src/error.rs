//! Error types for tacdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tacdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading corpora and query files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error while walking a corpus directory.
    #[error("Corpus walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A document fragment is not valid in the input encoding.
    #[error("Encoding error in {}: {message}", path.display())]
    Encoding {
        /// Source of the fragment
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// A document fragment has no usable document id.
    #[error("Document has no docid")]
    MissingDocId,

    /// The query file is not well-formed XML.
    #[error("Query XML error: {0}")]
    Xml(String),

    /// A query element lacks its id attribute or a required child.
    #[error("Query {query}: missing '{field}'")]
    MissingQueryField {
        /// Query id (or element position when the id itself is missing)
        query: String,
        /// Name of the missing attribute or child element
        field: &'static str,
    },

    /// An offset child does not hold an integer.
    #[error("Query {query}: invalid {field} offset '{value}'")]
    InvalidOffset {
        /// Query id
        query: String,
        /// Offset element name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// The span resolved for a query is empty or reversed.
    #[error("Query {query}: invalid span [{start}, {end})")]
    InvalidSpan {
        /// Query id
        query: String,
        /// Begin offset
        start: i64,
        /// End offset after adjustment
        end: i64,
    },

    /// Error while rendering output (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}
