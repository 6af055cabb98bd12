//! SGML fragment and query file parsing.

mod builder;
mod options;
mod query;
mod scanner;
mod splitter;
mod tokenizer;

pub use builder::{DocBuilder, DOCID_FIELD};
pub use options::{
    QueryFormat, QueryOptions, ReaderOptions, ScanOptions, DEFAULT_BODY_MARKER, DEFAULT_FIELDS,
};
pub use query::QueryReader;
pub use scanner::{decode_entities, DocScanner};
pub use splitter::{DocSplitter, DOC_END_TAG, DOC_START_TAG};
pub use tokenizer::{Token, Tokenizer};
