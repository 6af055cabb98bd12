//! JSON rendering for documents and queries.

use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document, query, or collection of them to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write one compact JSON object per line, stopping at the first error.
///
/// Returns the number of records written.
pub fn write_json_lines<W, T, I>(mut out: W, records: I) -> Result<usize>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = Result<T>>,
{
    let mut count = 0;
    for record in records {
        let line = to_json(&record?, JsonFormat::Compact)?;
        writeln!(out, "{}", line)?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}
