//! Tolerant tokenizer for SGML document fragments.
//!
//! The tokenizer does not validate nesting or attribute syntax. Anything
//! that does not look like a tag is passed through as text, and an
//! unterminated tag at the end of input becomes text as well.

/// A lexical unit of an SGML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Opening tag with lower-cased name and attributes.
    StartTag {
        /// Tag name
        name: String,
        /// Attributes in source order, names lower-cased
        attrs: Vec<(String, String)>,
    },

    /// Closing tag with lower-cased name.
    EndTag {
        /// Tag name
        name: String,
    },

    /// Character data between tags, undecoded.
    Text(&'a str),
}

/// Result of looking at a `<`.
enum Step<'a> {
    Emit(Token<'a>, usize),
    Skip(usize),
    NotATag,
}

/// Lazy tokenizer over one fragment.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer over `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Emit text from the current position up to the next `<` after `from`.
    fn text_until_next_tag(&mut self, from: usize) -> Token<'a> {
        let start = self.pos;
        let end = self.input[from..]
            .find('<')
            .map(|i| from + i)
            .unwrap_or(self.input.len());
        self.pos = end;
        Token::Text(&self.input[start..end])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }

            let rest = &self.input[self.pos..];
            if !rest.starts_with('<') {
                return Some(self.text_until_next_tag(self.pos));
            }

            match read_tag(rest) {
                Step::Emit(token, consumed) => {
                    self.pos += consumed;
                    return Some(token);
                }
                Step::Skip(consumed) => {
                    self.pos += consumed;
                }
                Step::NotATag => {
                    // Keep the '<' as text and resume at the next candidate.
                    return Some(self.text_until_next_tag(self.pos + 1));
                }
            }
        }
    }
}

/// Interpret the markup at the start of `rest`, which begins with `<`.
fn read_tag(rest: &str) -> Step<'_> {
    if let Some(body) = rest.strip_prefix("<!--") {
        return match body.find("-->") {
            Some(end) => Step::Skip(4 + end + 3),
            None => Step::NotATag,
        };
    }

    if rest.starts_with("<!") || rest.starts_with("<?") {
        return match rest.find('>') {
            Some(end) => Step::Skip(end + 1),
            None => Step::NotATag,
        };
    }

    if let Some(body) = rest.strip_prefix("</") {
        let name_len = name_length(body);
        if name_len == 0 {
            return Step::NotATag;
        }
        return match rest.find('>') {
            Some(end) => Step::Emit(
                Token::EndTag {
                    name: body[..name_len].to_ascii_lowercase(),
                },
                end + 1,
            ),
            None => Step::NotATag,
        };
    }

    let body = &rest[1..];
    if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Step::NotATag;
    }
    let Some(end) = rest.find('>') else {
        return Step::NotATag;
    };

    let name_len = name_length(body);
    let name = body[..name_len].to_ascii_lowercase();
    let attrs = parse_attributes(&rest[1 + name_len..end]);
    Step::Emit(Token::StartTag { name, attrs }, end + 1)
}

/// Length in bytes of the tag name at the start of `s`.
fn name_length(s: &str) -> usize {
    s.find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')))
        .unwrap_or(s.len())
}

/// Parse `name=value` pairs from the inside of a start tag.
///
/// Values may be quoted with `"` or `'`, unquoted, or absent; an attribute
/// without a value takes its own name as value.
fn parse_attributes(mut s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();

    loop {
        s = s.trim_start();
        if s.is_empty() {
            break;
        }

        let name_end = s
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(s.len());
        if name_end == 0 {
            // Stray '=' or '/'
            s = &s[1..];
            continue;
        }
        let name = s[..name_end].to_ascii_lowercase();
        s = s[name_end..].trim_start();

        let Some(after_eq) = s.strip_prefix('=') else {
            attrs.push((name.clone(), name));
            continue;
        };
        s = after_eq.trim_start();

        let value;
        match s.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &s[1..];
                let close = inner.find(quote).unwrap_or(inner.len());
                value = inner[..close].to_string();
                s = inner.get(close + 1..).unwrap_or("");
            }
            _ => {
                let end = s.find(char::is_whitespace).unwrap_or(s.len());
                value = s[..end].to_string();
                s = &s[end..];
            }
        }
        attrs.push((name, value));
    }

    attrs
}
