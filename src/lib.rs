//! # tacdoc
//!
//! Offset-preserving text extraction for SGML news corpora.
//!
//! Annotation files address documents by character offsets into their text
//! *after* markup removal. This library produces that text without moving a
//! single character: headers and tags are overwritten with spaces, so the
//! clean text has the same length as the raw `<DOC>` fragment and offsets
//! can be used as-is.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! fn main() -> tacdoc::Result<()> {
//!     let docs: HashMap<String, tacdoc::Document> = tacdoc::read_corpus("data/source")
//!         .map(|doc| doc.map(|d| (d.id().to_string(), d)))
//!         .collect::<tacdoc::Result<_>>()?;
//!
//!     for query in tacdoc::read_queries("data/queries.xml")? {
//!         let query = query?;
//!         if let Some(span) = docs.get(&query.doc_id).and_then(|d| query.span_in(d)) {
//!             println!("{}\t{}", query, span);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - [`DocSplitter`]: cuts a corpus stream into `<DOC>` fragments
//! - [`DocScanner`]: extracts tracked fields and attributes
//! - [`TextBuilder`]: blanks header and markup, keeping length
//! - [`QueryReader`]: streams typed query records from XML
//! - [`CorpusReader`]: walks a directory tree and yields documents

pub mod corpus;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use corpus::{CorpusReader, Documents, FileDocuments, Files};
pub use detect::{detect_compression_from_path, Compression};
pub use error::{Error, Result};
pub use model::{Attrs, Document, Query};
pub use parser::{
    DocBuilder, DocScanner, DocSplitter, QueryFormat, QueryOptions, QueryReader, ReaderOptions,
    ScanOptions,
};
pub use render::{JsonFormat, TextBuilder};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Encoding of corpus and query files.
pub const ENCODING: &str = "utf-8";

/// Read every document under a corpus root.
///
/// # Example
///
/// ```no_run
/// let count = tacdoc::read_corpus("data/source").filter(|d| d.is_ok()).count();
/// println!("{} documents", count);
/// ```
pub fn read_corpus<P: AsRef<Path>>(root: P) -> Documents {
    CorpusReader::new(root.as_ref()).documents()
}

/// Read every document under a corpus root with custom options.
pub fn read_corpus_with_options<P: AsRef<Path>>(root: P, options: ReaderOptions) -> Documents {
    CorpusReader::with_options(root.as_ref(), options).documents()
}

/// Read the documents of one corpus file.
pub fn read_documents<P: AsRef<Path>>(path: P) -> Result<FileDocuments> {
    FileDocuments::open(path, DocBuilder::new())
}

/// Read a query file with the default end-offset adjustment.
pub fn read_queries<P: AsRef<Path>>(path: P) -> Result<QueryReader<BufReader<File>>> {
    QueryReader::open(path)
}

/// Read a query file with custom options.
pub fn read_queries_with_options<P: AsRef<Path>>(
    path: P,
    options: QueryOptions,
) -> Result<QueryReader<BufReader<File>>> {
    QueryReader::open_with_options(path, options)
}

/// Build a document from one raw `<DOC>` fragment.
///
/// # Example
///
/// ```
/// let doc = tacdoc::build_document("<DOC><DOCID>D1</DOCID><TEXT>Hello</TEXT></DOC>")?;
/// assert_eq!(doc.id(), "D1");
/// assert_eq!(doc.text().trim(), "Hello");
/// # Ok::<(), tacdoc::Error>(())
/// ```
pub fn build_document(raw: &str) -> Result<Document> {
    DocBuilder::new().build(raw.to_string())
}

/// Blank the header and markup of a fragment, keeping its length.
pub fn build_text(raw: &str) -> String {
    TextBuilder::new().build(raw)
}
