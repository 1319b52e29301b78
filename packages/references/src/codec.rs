//! Asset reference token codec
//!
//! Grammar of a token embedded in page content:
//!
//! ```text
//! token := "[[asset:" id ":" name "]]"
//! id    := 1* any char except ':' '[' ']' line-break
//! name  := 1* any char except line-break, ending at the first "]]"
//! ```
//!
//! Colons are allowed inside the name since the id ends at the first colon.
//! Anything that does not complete the full shape (unterminated tokens,
//! empty fields, line breaks) stays plain text, and scanning resumes one
//! character past where the failed candidate started.

use crate::{ReferenceError, ReferenceResult};
use serde::Serialize;

const OPEN: &str = "[[asset:";
const CLOSE: &str = "]]";

/// Asset mention decoded from a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reference<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl<'a> Reference<'a> {
    /// Re-encode as a token
    pub fn to_token(&self) -> String {
        format!("{OPEN}{}:{}{CLOSE}", self.id, self.name)
    }
}

/// One piece of decoded content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Segment<'a> {
    Text { text: &'a str },
    Reference(Reference<'a>),
}

impl<'a> Segment<'a> {
    /// Human-readable text: plain text as-is, mentions as their display name
    pub fn display_text(&self) -> &'a str {
        match self {
            Segment::Text { text } => text,
            Segment::Reference(reference) => reference.name,
        }
    }
}

/// Encode an asset mention as `[[asset:<id>:<name>]]`
pub fn encode(id: &str, name: &str) -> ReferenceResult<String> {
    if id.is_empty() {
        return Err(ReferenceError::EmptyId);
    }
    if id.chars().any(is_reserved_in_id) {
        return Err(ReferenceError::InvalidId(id.to_string()));
    }
    if name.is_empty() || name.contains(CLOSE) || name.chars().any(is_line_break) {
        return Err(ReferenceError::InvalidName(name.to_string()));
    }
    // A trailing ']' would merge into the closing "]]"
    if name.ends_with(']') {
        return Err(ReferenceError::InvalidName(name.to_string()));
    }

    Ok(Reference { id, name }.to_token())
}

/// Lazily split content into text and reference segments
///
/// Concatenating every segment's source text reproduces the input exactly;
/// empty text segments are never produced.
pub fn decode(content: &str) -> Segments<'_> {
    Segments {
        content,
        pos: 0,
        pending: None,
    }
}

/// Every well-formed reference in content, in order
pub fn references(content: &str) -> impl Iterator<Item = Reference<'_>> {
    decode(content).filter_map(|segment| match segment {
        Segment::Reference(reference) => Some(reference),
        Segment::Text { .. } => None,
    })
}

/// Content with every token replaced by its display name
pub fn display_text(content: &str) -> String {
    decode(content).map(|s| s.display_text()).collect()
}

/// Iterator returned by [`decode`]
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    content: &'a str,
    pos: usize,
    pending: Option<Reference<'a>>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(reference) = self.pending.take() {
            return Some(Segment::Reference(reference));
        }

        let content = self.content;
        if self.pos >= content.len() {
            return None;
        }

        let mut search = self.pos;
        while let Some(offset) = content[search..].find(OPEN) {
            let start = search + offset;

            if let Some((reference, end)) = scan_token(content, start) {
                let text = &content[self.pos..start];
                self.pos = end;

                if text.is_empty() {
                    return Some(Segment::Reference(reference));
                }
                self.pending = Some(reference);
                return Some(Segment::Text { text });
            }

            // '[' is a single byte so this stays on a char boundary
            search = start + 1;
        }

        let text = &content[self.pos..];
        self.pos = content.len();
        Some(Segment::Text { text })
    }
}

/// Try to read a complete token starting at `start`
///
/// Returns the reference and the byte offset just past the closing `]]`.
fn scan_token(content: &str, start: usize) -> Option<(Reference<'_>, usize)> {
    let body_start = start + OPEN.len();
    let body = &content[body_start..];

    let id_end = body.find(|c: char| c == ':' || is_reserved_in_id(c))?;
    if id_end == 0 || !body[id_end..].starts_with(':') {
        return None;
    }
    let id = &body[..id_end];

    let name_start = id_end + 1;
    let rest = &body[name_start..];
    let close = rest.find(CLOSE)?;
    let name = &rest[..close];
    if name.is_empty() || name.chars().any(is_line_break) {
        return None;
    }

    let end = body_start + name_start + close + CLOSE.len();
    Some((Reference { id, name }, end))
}

fn is_reserved_in_id(c: char) -> bool {
    matches!(c, ':' | '[' | ']') || is_line_break(c)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
