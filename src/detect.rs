//! Compression detection for corpus files.

use crate::error::Result;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// How a corpus file is stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Plain text
    #[default]
    None,
    /// gzip stream (possibly multi-member)
    Gzip,
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "plain"),
            Compression::Gzip => write!(f, "gzip"),
        }
    }
}

/// File name suffix of gzip-compressed corpus files.
const GZIP_SUFFIX: &str = ".gz";

/// Detect compression from a file name.
///
/// Only the suffix is consulted; the file is not opened.
///
/// # Example
/// ```
/// use tacdoc::detect::{detect_compression_from_path, Compression};
///
/// assert_eq!(detect_compression_from_path("nw/afp.sgm.gz"), Compression::Gzip);
/// assert_eq!(detect_compression_from_path("nw/afp.sgm"), Compression::None);
/// ```
pub fn detect_compression_from_path<P: AsRef<Path>>(path: P) -> Compression {
    let name = path.as_ref().to_string_lossy();
    if name.ends_with(GZIP_SUFFIX) {
        Compression::Gzip
    } else {
        Compression::None
    }
}

/// Open a corpus file as a buffered reader, decompressing when the name
/// says so.
pub fn open_corpus_file<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let compression = detect_compression_from_path(path);
    log::debug!("Opening {} ({})", path.display(), compression);
    Ok(wrap_reader(file, compression))
}

/// Wrap a raw reader according to its compression.
pub fn wrap_reader<R: Read + 'static>(reader: R, compression: Compression) -> Box<dyn BufRead> {
    match compression {
        Compression::None => Box::new(BufReader::new(reader)),
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(reader))),
    }
}
