//! Builds [`Document`]s from raw fragments.

use crate::error::{Error, Result};
use crate::model::Document;
use crate::render::TextBuilder;

use super::options::ReaderOptions;
use super::scanner::DocScanner;

/// Field whose value identifies a document.
pub const DOCID_FIELD: &str = "docid";

/// Turns one `<DOC>` fragment into a [`Document`].
#[derive(Debug, Clone)]
pub struct DocBuilder {
    scanner: DocScanner,
    text: TextBuilder,
}

impl DocBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::with_options(ReaderOptions::default())
    }

    /// Create a builder with custom options.
    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            text: TextBuilder::with_body_marker(&options.body_marker),
            scanner: DocScanner::with_options(options.scan),
        }
    }

    /// Build a document from its raw fragment.
    ///
    /// Fails with [`Error::MissingDocId`] when the fragment has no non-blank
    /// `docid`. Other missing fields are simply absent from the attributes.
    pub fn build(&self, raw: String) -> Result<Document> {
        let attrs = self.scanner.scan(&raw);
        let id = attrs
            .get(DOCID_FIELD)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingDocId)?
            .to_string();
        let text = self.text.build(&raw);
        Ok(Document::new(id, text, raw, attrs))
    }
}

impl Default for DocBuilder {
    fn default() -> Self {
        Self::new()
    }
}
