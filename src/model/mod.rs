//! Data model for corpus documents and annotation queries.
//!
//! Both types are immutable once built and serialize with serde, so they can
//! be handed to downstream alignment code or written out as JSON.

mod document;
mod query;

pub use document::{Attrs, Document};
pub use query::Query;
