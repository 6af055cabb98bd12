//! Reader options and configuration.

use std::collections::{BTreeMap, BTreeSet};

/// Fields whose text content is extracted by default.
pub const DEFAULT_FIELDS: [&str; 5] = ["docid", "doctype", "datetime", "headline", "text"];

/// Body-begin marker; everything up to and including it is header.
pub const DEFAULT_BODY_MARKER: &str = "<TEXT>";

/// Options for scanning a document fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Tags whose character data is captured, by lower-case name
    pub fields: BTreeSet<String>,

    /// Attributes captured per tag, by lower-case name
    pub attributes: BTreeMap<String, BTreeSet<String>>,
}

impl ScanOptions {
    /// Create scan options with the default field and attribute sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that track nothing.
    pub fn empty() -> Self {
        Self {
            fields: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Track the text of another field.
    pub fn with_field(mut self, tag: impl AsRef<str>) -> Self {
        self.fields.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Track an attribute of a tag.
    pub fn with_attribute(mut self, tag: impl AsRef<str>, attribute: impl AsRef<str>) -> Self {
        self.attributes
            .entry(tag.as_ref().to_ascii_lowercase())
            .or_default()
            .insert(attribute.as_ref().to_ascii_lowercase());
        self
    }

    /// Whether character data of `tag` is captured.
    pub fn tracks_field(&self, tag: &str) -> bool {
        self.fields.contains(tag)
    }

    /// Attributes captured for `tag`, if any.
    pub fn tracked_attributes(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.attributes.get(tag)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        DEFAULT_FIELDS
            .iter()
            .fold(Self::empty(), |options, field| options.with_field(field))
            .with_attribute("doctype", "source")
    }
}

/// Options for turning fragments into documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Field and attribute tracking
    pub scan: ScanOptions,

    /// Marker ending the header region
    pub body_marker: String,
}

impl ReaderOptions {
    /// Create reader options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set scan options.
    pub fn with_scan_options(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    /// Set the body-begin marker.
    pub fn with_body_marker(mut self, marker: impl Into<String>) -> Self {
        self.body_marker = marker.into();
        self
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            body_marker: DEFAULT_BODY_MARKER.to_string(),
        }
    }
}

/// Revision of the query file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryFormat {
    /// End offsets are already exclusive (2011 and earlier)
    Legacy,
    /// End offsets are inclusive (2012 onward)
    #[default]
    Current,
}

impl QueryFormat {
    /// Amount added to each end offset.
    pub fn end_adjustment(self) -> i64 {
        match self {
            QueryFormat::Legacy => 0,
            QueryFormat::Current => 1,
        }
    }
}

/// Options for reading query files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Integer added to every `end` value
    pub end_adjustment: i64,
}

impl QueryOptions {
    /// Create query options with the default adjustment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the end-offset adjustment.
    pub fn with_end_adjustment(mut self, adjustment: i64) -> Self {
        self.end_adjustment = adjustment;
        self
    }

    /// Use the adjustment of a known format revision.
    pub fn with_format(self, format: QueryFormat) -> Self {
        self.with_end_adjustment(format.end_adjustment())
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            end_adjustment: QueryFormat::default().end_adjustment(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scan_options() {
        let options = ScanOptions::default();
        for field in DEFAULT_FIELDS {
            assert!(options.tracks_field(field));
        }
        assert!(!options.tracks_field("p"));
        assert!(options
            .tracked_attributes("doctype")
            .is_some_and(|attrs| attrs.contains("source")));
        assert!(options.tracked_attributes("docid").is_none());
    }

    #[test]
    fn test_scan_options_builder_lowercases() {
        let options = ScanOptions::empty()
            .with_field("POSTER")
            .with_attribute("DOC", "ID");
        assert!(options.tracks_field("poster"));
        assert!(options
            .tracked_attributes("doc")
            .is_some_and(|attrs| attrs.contains("id")));
    }

    #[test]
    fn test_reader_options_builder() {
        let options = ReaderOptions::new().with_body_marker("<BODY>");
        assert_eq!(options.body_marker, "<BODY>");
        assert_eq!(options.scan, ScanOptions::default());
    }

    #[test]
    fn test_query_options() {
        assert_eq!(QueryOptions::default().end_adjustment, 1);
        assert_eq!(
            QueryOptions::new()
                .with_format(QueryFormat::Legacy)
                .end_adjustment,
            0
        );
        assert_eq!(QueryOptions::new().with_end_adjustment(3).end_adjustment, 3);
    }
}
