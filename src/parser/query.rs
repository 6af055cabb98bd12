//! Streaming reader for annotation query files.
//!
//! A query file looks like
//!
//! ```xml
//! <kbpentlink>
//!   <query id="EL_00001">
//!     <name>Paris</name>
//!     <docid>AFP_ENG_20070101.0001</docid>
//!     <beg>10</beg>
//!     <end>14</end>
//!   </query>
//! </kbpentlink>
//! ```
//!
//! Other elements are ignored, so the reader also accepts files that carry
//! extra children or wrapper elements.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::Query;

use super::options::QueryOptions;

const QUERY_ELEM: &[u8] = b"query";
const QID_ATTR: &str = "id";
const DOCID_ELEM: &str = "docid";
const START_ELEM: &str = "beg";
const END_ELEM: &str = "end";
const NAME_ELEM: &str = "name";

/// Lazy iterator over the queries of a query file, in file order.
///
/// The first error ends the iteration.
///
/// # Example
///
/// ```
/// use tacdoc::parser::{QueryOptions, QueryReader};
///
/// let xml = r#"<queries><query id="q1"><name>Paris</name><docid>D1</docid>
///     <beg>10</beg><end>20</end></query></queries>"#;
/// let queries: Vec<_> = QueryReader::new(xml.as_bytes(), QueryOptions::default())
///     .collect::<tacdoc::Result<_>>()
///     .unwrap();
/// assert_eq!(queries[0].start, 10);
/// assert_eq!(queries[0].end, 21);
/// ```
pub struct QueryReader<R> {
    reader: Reader<R>,
    options: QueryOptions,
    buf: Vec<u8>,
    seen: usize,
    done: bool,
}

impl QueryReader<BufReader<File>> {
    /// Open a query file with the default end-offset adjustment.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, QueryOptions::default())
    }

    /// Open a query file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: QueryOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        log::debug!("Reading queries from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file), options))
    }
}

impl<R: BufRead> QueryReader<R> {
    /// Read queries from a buffered reader.
    pub fn new(reader: R, options: QueryOptions) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            options,
            buf: Vec::new(),
            seen: 0,
            done: false,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn next_query(&mut self) -> Result<Option<Query>> {
        loop {
            self.buf.clear();
            let (id, empty) = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(ref e) if is_query(e) => (query_id(e)?, false),
                Event::Empty(ref e) if is_query(e) => (query_id(e)?, true),
                Event::Eof => return Ok(None),
                _ => continue,
            };

            self.seen += 1;
            let id = id.ok_or_else(|| Error::MissingQueryField {
                query: format!("#{}", self.seen),
                field: QID_ATTR,
            })?;
            let children = if empty {
                HashMap::new()
            } else {
                self.read_children(&id)?
            };
            return self.build(id, children).map(Some);
        }
    }

    /// Collect the direct children of the current query element.
    fn read_children(&mut self, id: &str) -> Result<HashMap<String, String>> {
        let mut children = HashMap::new();
        let mut current: Option<(String, String)> = None;
        let mut depth = 0usize;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => {
                    depth += 1;
                    if depth == 1 {
                        current = Some((element_name(&e), String::new()));
                    }
                }
                Event::Empty(e) if depth == 0 => {
                    children.insert(element_name(&e), String::new());
                }
                Event::Text(e) if depth == 1 => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) if depth == 1 => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Ok(children);
                    }
                    if depth == 1 {
                        if let Some((name, text)) = current.take() {
                            children.insert(name, text.trim().to_string());
                        }
                    }
                    depth -= 1;
                }
                Event::Eof => {
                    return Err(Error::Xml(format!(
                        "unexpected end of file inside query {}",
                        id
                    )));
                }
                _ => {}
            }
        }
    }

    fn build(&self, id: String, mut children: HashMap<String, String>) -> Result<Query> {
        let mut take = |field: &'static str| {
            children
                .remove(field)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::MissingQueryField {
                    query: id.clone(),
                    field,
                })
        };
        let doc_id = take(DOCID_ELEM)?;
        let beg = take(START_ELEM)?;
        let end = take(END_ELEM)?;
        let name = take(NAME_ELEM)?;

        let start = parse_offset(&id, START_ELEM, &beg)?;
        let end =
            parse_offset(&id, END_ELEM, &end)?.saturating_add(self.options.end_adjustment);
        if start < 0 || end <= start {
            return Err(Error::InvalidSpan {
                query: id,
                start,
                end,
            });
        }

        Ok(Query {
            id,
            doc_id,
            start: start as usize,
            end: end as usize,
            name,
        })
    }
}

impl<R: BufRead> Iterator for QueryReader<R> {
    type Item = Result<Query>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_query() {
            Ok(Some(query)) => Some(Ok(query)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn is_query(e: &BytesStart<'_>) -> bool {
    e.name().as_ref() == QUERY_ELEM
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn query_id(e: &BytesStart<'_>) -> Result<Option<String>> {
    match e.try_get_attribute(QID_ATTR)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn parse_offset(query: &str, field: &'static str, value: &str) -> Result<i64> {
    value.parse().map_err(|_| Error::InvalidOffset {
        query: query.to_string(),
        field,
        value: value.to_string(),
    })
}
