//! Field and attribute extraction from one document fragment.

use std::borrow::Cow;

use crate::model::Attrs;

use super::options::ScanOptions;
use super::tokenizer::{Token, Tokenizer};

/// Longest entity name looked at when decoding, excluding `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Scanner state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    /// Not inside a tracked field
    Idle,
    /// Collecting character data for a field
    Capturing { field: String, buffer: String },
}

/// Extracts tracked fields and attributes from SGML fragments.
///
/// # Example
///
/// ```
/// use tacdoc::parser::DocScanner;
///
/// let attrs = DocScanner::new().scan("<DOC><DOCID>D1</DOCID><TEXT>Hello</TEXT></DOC>");
/// assert_eq!(attrs["docid"], "D1");
/// assert_eq!(attrs["text"], "Hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocScanner {
    options: ScanOptions,
}

impl DocScanner {
    /// Create a scanner with the default field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scanner with custom options.
    pub fn with_options(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan options in use.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan a fragment and return the extracted values.
    ///
    /// Fields that never close are left out, as are fields and attributes
    /// that do not appear at all.
    pub fn scan(&self, fragment: &str) -> Attrs {
        let mut attrs = Attrs::new();
        let mut state = ScanState::Idle;

        for token in Tokenizer::new(fragment) {
            state = match (state, token) {
                (state, Token::StartTag { name, attrs: tag_attrs }) => {
                    self.capture_attributes(&name, tag_attrs, &mut attrs);
                    if self.options.tracks_field(&name) {
                        ScanState::Capturing {
                            field: name,
                            buffer: String::new(),
                        }
                    } else {
                        state
                    }
                }
                (ScanState::Capturing { field, mut buffer }, Token::Text(text)) => {
                    buffer.push_str(&decode_entities(text));
                    ScanState::Capturing { field, buffer }
                }
                (ScanState::Capturing { field, buffer }, Token::EndTag { name })
                    if name == field =>
                {
                    attrs.insert(field, buffer);
                    ScanState::Idle
                }
                (ScanState::Idle, Token::EndTag { name }) if self.options.tracks_field(&name) => {
                    log::warn!("Ignoring </{}> with no open field", name);
                    ScanState::Idle
                }
                (state, _) => state,
            };
        }

        if let ScanState::Capturing { field, .. } = state {
            log::debug!("Field <{}> never closed; dropped", field);
        }

        attrs
    }

    /// Store tracked attribute values of a start tag.
    fn capture_attributes(&self, tag: &str, tag_attrs: Vec<(String, String)>, out: &mut Attrs) {
        let Some(wanted) = self.options.tracked_attributes(tag) else {
            return;
        };
        for (name, value) in tag_attrs {
            if wanted.contains(&name) {
                out.insert(name, decode_entities(&value).into_owned());
            }
        }
    }
}

/// Decode the standard named entities and numeric character references.
///
/// Unknown or malformed references are kept verbatim, not dropped, and
/// character references decode over the full Unicode range in decimal or
/// hex. Classic SGML parsers drop unknown references and decode ASCII
/// only; keep this decoder lossless.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi <= MAX_ENTITY_LEN)
            .and_then(|semi| resolve_entity(&after[..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<DOC>\n\
<DOCID> AFP_ENG_20070101.0001 </DOCID>\n\
<DOCTYPE SOURCE=\"newswire\"> NEWS STORY </DOCTYPE>\n\
<DATETIME> 2007-01-01 </DATETIME>\n\
<BODY>\n\
<HEADLINE>\nStorm &amp; flood\n</HEADLINE>\n\
<TEXT>\n<P>\nFirst.\n</P>\n<P>\nSecond.\n</P>\n</TEXT>\n\
</BODY>\n\
</DOC>\n";

    #[test]
    fn test_scan_minimal_fragment() {
        let attrs = DocScanner::new().scan("<DOC><DOCID>D1</DOCID><TEXT>Hello</TEXT></DOC>");
        assert_eq!(attrs.get("docid").map(String::as_str), Some("D1"));
        assert_eq!(attrs.get("text").map(String::as_str), Some("Hello"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_scan_full_fragment() {
        let attrs = DocScanner::new().scan(SAMPLE);
        assert_eq!(attrs["docid"], " AFP_ENG_20070101.0001 ");
        assert_eq!(attrs["doctype"], " NEWS STORY ");
        assert_eq!(attrs["source"], "newswire");
        assert_eq!(attrs["datetime"], " 2007-01-01 ");
        assert_eq!(attrs["headline"], "\nStorm & flood\n");
        assert_eq!(attrs["text"], "\n\nFirst.\n\n\nSecond.\n\n");
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let attrs = DocScanner::new().scan("<DOC><DOCID>D2</DOCID></DOC>");
        assert!(!attrs.contains_key("headline"));
        assert!(!attrs.contains_key("source"));
    }

    #[test]
    fn test_unclosed_field_does_not_abort() {
        let attrs = DocScanner::new().scan("<DOC><HEADLINE>cut off<DOCID>D3</DOCID>");
        assert_eq!(attrs.get("docid").map(String::as_str), Some("D3"));
        assert!(!attrs.contains_key("headline"));
    }

    #[test]
    fn test_stray_end_tag_is_ignored() {
        let attrs = DocScanner::new().scan("</TEXT><DOCID>D4</DOCID>");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["docid"], "D4");
    }

    #[test]
    fn test_field_and_attribute_on_same_tag() {
        let options = ScanOptions::empty()
            .with_field("doctype")
            .with_attribute("doctype", "source");
        let attrs = DocScanner::with_options(options).scan("<DOCTYPE SOURCE=wire>NEWS</DOCTYPE>");
        assert_eq!(attrs["doctype"], "NEWS");
        assert_eq!(attrs["source"], "wire");
    }

    #[test]
    fn test_attribute_without_end_tag() {
        let attrs = DocScanner::new().scan("<DOCTYPE SOURCE=\"web\">");
        assert_eq!(attrs["source"], "web");
        assert!(!attrs.contains_key("doctype"));
    }

    #[test]
    fn test_custom_fields() {
        let options = ScanOptions::empty().with_field("poster");
        let attrs = DocScanner::with_options(options).scan("<POSTER>bob</POSTER><DOCID>x</DOCID>");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["poster"], "bob");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;x&gt; &quot;&apos;"), "<x> \"'");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("AT&T &nbsp; &"), "AT&T &nbsp; &");
        assert!(matches!(decode_entities("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_unknown_entity_kept_in_field() {
        let attrs = DocScanner::new().scan("<HEADLINE>AT&T &nbsp;x &#233;</HEADLINE>");
        assert_eq!(attrs["headline"], "AT&T &nbsp;x é");
    }
}
