//! Corpus traversal: every document of every file under a root directory.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::model::Document;
use crate::parser::{DocBuilder, DocSplitter, ReaderOptions};

/// Reader for a directory tree of SGML corpus files.
///
/// Files are visited top-down: within each directory, its files come first
/// sorted by name, then its subdirectories sorted by name.
/// Every regular file is read, whatever its extension; `.gz` files are
/// decompressed.
///
/// # Example
///
/// ```no_run
/// use tacdoc::CorpusReader;
///
/// let corpus = CorpusReader::new("data/source");
/// for doc in &corpus {
///     let doc = doc?;
///     println!("{} {}", doc.id(), doc);
/// }
/// # Ok::<(), tacdoc::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CorpusReader {
    root: PathBuf,
    builder: DocBuilder,
}

impl CorpusReader {
    /// Create a reader with default options.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, ReaderOptions::default())
    }

    /// Create a reader with custom options.
    pub fn with_options(root: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            root: root.into(),
            builder: DocBuilder::with_options(options),
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All files under the root, in walk order.
    pub fn files(&self) -> Files {
        let walker = WalkDir::new(&self.root)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();
        Files { walker }
    }

    /// Documents of a single file.
    pub fn docs<P: AsRef<Path>>(&self, path: P) -> Result<FileDocuments> {
        FileDocuments::open(path, self.builder.clone())
    }

    /// Documents of all files, flattened.
    pub fn documents(&self) -> Documents {
        Documents {
            files: self.files(),
            current: None,
            reader: self.clone(),
        }
    }
}

impl IntoIterator for &CorpusReader {
    type Item = Result<Document>;
    type IntoIter = Documents;

    fn into_iter(self) -> Self::IntoIter {
        self.documents()
    }
}

/// Iterator over corpus file paths.
pub struct Files {
    walker: walkdir::IntoIter,
}

impl Iterator for Files {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if entry.path().is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Iterator over the documents of one file.
pub struct FileDocuments {
    splitter: DocSplitter<Box<dyn BufRead>>,
    builder: DocBuilder,
}

impl FileDocuments {
    /// Open a corpus file, building documents with `builder`.
    pub fn open<P: AsRef<Path>>(path: P, builder: DocBuilder) -> Result<Self> {
        Ok(Self {
            splitter: DocSplitter::open(path)?,
            builder,
        })
    }

    /// File being read.
    pub fn path(&self) -> &Path {
        self.splitter.source()
    }
}

impl Iterator for FileDocuments {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let fragment = self.splitter.next()?;
        Some(fragment.and_then(|raw| self.builder.build(raw)))
    }
}

/// Iterator over the documents of a whole corpus.
///
/// Errors are yielded where they occur; pulling again continues with the
/// next fragment or file.
pub struct Documents {
    files: Files,
    current: Option<FileDocuments>,
    reader: CorpusReader,
}

impl Iterator for Documents {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(docs) = self.current.as_mut() {
                if let Some(doc) = docs.next() {
                    return Some(doc);
                }
                self.current = None;
            }

            match self.files.next()? {
                Ok(path) => match self.reader.docs(&path) {
                    Ok(docs) => self.current = Some(docs),
                    Err(e) => return Some(Err(e)),
                },
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
