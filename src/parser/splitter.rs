//! Splits a corpus stream into one raw fragment per document.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::detect::open_corpus_file;
use crate::error::{Error, Result};
use crate::ENCODING;

/// Line that opens a document.
pub const DOC_START_TAG: &str = "<DOC>";

/// Line that closes a document.
pub const DOC_END_TAG: &str = "</DOC>";

/// Lazy iterator over the `<DOC>` ... `</DOC>` fragments of a stream.
///
/// Each fragment runs from its start marker line through its end marker line,
/// with line endings kept. Lines outside a fragment are skipped. A fragment
/// still open at end of stream is dropped.
///
/// # Example
///
/// ```
/// use tacdoc::parser::DocSplitter;
///
/// let data = "junk\n<DOC>\n<DOCID>D1</DOCID>\n</DOC>\n";
/// let fragments: Vec<String> = DocSplitter::new(data.as_bytes())
///     .collect::<tacdoc::Result<_>>()
///     .unwrap();
/// assert_eq!(fragments, vec!["<DOC>\n<DOCID>D1</DOCID>\n</DOC>\n"]);
/// ```
pub struct DocSplitter<R> {
    reader: R,
    source: PathBuf,
    line: Vec<u8>,
    doc: Option<Vec<u8>>,
    done: bool,
}

impl DocSplitter<Box<dyn BufRead>> {
    /// Open a corpus file, decompressing `.gz` files transparently.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_corpus_file(path)?;
        Ok(Self::with_source(reader, path))
    }
}

impl<R: BufRead> DocSplitter<R> {
    /// Split fragments from a buffered reader.
    pub fn new(reader: R) -> Self {
        Self::with_source(reader, "<stream>")
    }

    /// Split fragments from a reader, naming its source in errors.
    pub fn with_source(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
            line: Vec::new(),
            doc: None,
            done: false,
        }
    }

    /// Source named in errors and logs.
    pub fn source(&self) -> &Path {
        &self.source
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<String> {
        String::from_utf8(bytes).map_err(|e| Error::Encoding {
            path: self.source.clone(),
            message: format!("not valid {}: {}", ENCODING, e.utf8_error()),
        })
    }
}

/// Whether a raw line equals `marker` once surrounding whitespace is removed.
fn is_marker(line: &[u8], marker: &str) -> bool {
    std::str::from_utf8(line).is_ok_and(|s| s.trim() == marker)
}

impl<R: BufRead> Iterator for DocSplitter<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.done = true;
                    if self.doc.take().is_some() {
                        log::debug!(
                            "Dropping unterminated {} fragment at end of {}",
                            DOC_START_TAG,
                            self.source.display()
                        );
                    }
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }

            if is_marker(&self.line, DOC_START_TAG) {
                if self.doc.is_some() {
                    log::debug!(
                        "Restarting fragment at nested {} in {}",
                        DOC_START_TAG,
                        self.source.display()
                    );
                }
                self.doc = Some(Vec::new());
            }

            if let Some(doc) = self.doc.as_mut() {
                doc.extend_from_slice(&self.line);
            }

            if is_marker(&self.line, DOC_END_TAG) {
                if let Some(doc) = self.doc.take() {
                    return Some(self.decode(doc));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(data: &[u8]) -> Vec<String> {
        DocSplitter::new(data).collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_split_well_formed_blocks() {
        let data = b"<DOC>\na\n</DOC>\n<DOC>\nb\n</DOC>\n<DOC>\nc\n</DOC>";
        let fragments = split(data);
        assert_eq!(fragments.len(), 3);
        for fragment in &fragments {
            assert!(fragment.starts_with(DOC_START_TAG));
            assert!(fragment.trim_end().ends_with(DOC_END_TAG));
        }
        assert_eq!(fragments[2], "<DOC>\nc\n</DOC>");
    }

    #[test]
    fn test_dangling_fragment_dropped() {
        let data = b"<DOC>\na\n</DOC>\n<DOC>\nb\n";
        assert_eq!(split(data), vec!["<DOC>\na\n</DOC>\n"]);
    }

    #[test]
    fn test_outside_lines_discarded() {
        let data = b"header\n<DOC>\nx\n</DOC>\nbetween\n</DOC>\ntrailer\n";
        assert_eq!(split(data), vec!["<DOC>\nx\n</DOC>\n"]);
    }

    #[test]
    fn test_markers_trimmed_and_line_endings_kept() {
        let data = b"  <DOC>  \r\nbody\r\n</DOC>\r\n";
        assert_eq!(split(data), vec!["  <DOC>  \r\nbody\r\n</DOC>\r\n"]);
    }

    #[test]
    fn test_nested_start_restarts() {
        let data = b"<DOC>\nlost\n<DOC>\nkept\n</DOC>\n";
        assert_eq!(split(data), vec!["<DOC>\nkept\n</DOC>\n"]);
    }

    #[test]
    fn test_marker_must_be_whole_line() {
        let data = b"<DOC> id=1\n</DOC>\n";
        assert!(split(data).is_empty());
    }

    #[test]
    fn test_invalid_utf8_inside_fragment_is_error() {
        let data = b"<DOC>\n\xff\xfe\n</DOC>\n";
        let result: Vec<_> = DocSplitter::new(&data[..]).collect();
        assert_eq!(result.len(), 1);
        assert!(matches!(result[0], Err(Error::Encoding { .. })));
    }

    #[test]
    fn test_invalid_utf8_outside_fragment_ignored() {
        let data = b"\xff\n<DOC>\nok\n</DOC>\n";
        assert_eq!(split(data), vec!["<DOC>\nok\n</DOC>\n"]);
    }

    #[test]
    fn test_empty_stream() {
        assert!(split(b"").is_empty());
    }
}
