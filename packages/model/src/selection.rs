//! Byte-offset text selections over page content

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Selection is empty")]
    Empty,

    #[error("Offset range {start}..{end} is outside content of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Offset {0} does not fall on a character boundary")]
    NotCharBoundary(usize),
}

/// Span of content captured at selection time
///
/// Offsets are byte offsets into the UTF-8 content the selection was taken
/// from and are only meaningful against that exact string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    /// Capture `content[start..end]`
    pub fn capture(content: &str, start: usize, end: usize) -> Result<Self, SelectionError> {
        check_range(content, start, end)?;
        if start == end {
            return Err(SelectionError::Empty);
        }
        Ok(Self {
            start,
            end,
            text: content[start..end].to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `content[..start] + replacement + content[end..]`
    pub fn splice(&self, content: &str, replacement: &str) -> Result<String, SelectionError> {
        splice(content, self.start, self.end, replacement)
    }
}

/// Replace `content[start..end]` with `replacement`
pub fn splice(
    content: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> Result<String, SelectionError> {
    check_range(content, start, end)?;

    let mut out = String::with_capacity(content.len() - (end - start) + replacement.len());
    out.push_str(&content[..start]);
    out.push_str(replacement);
    out.push_str(&content[end..]);
    Ok(out)
}

/// Insert `text` at byte `offset`
pub fn insert_at(content: &str, offset: usize, text: &str) -> Result<String, SelectionError> {
    splice(content, offset, offset, text)
}

fn check_range(content: &str, start: usize, end: usize) -> Result<(), SelectionError> {
    if start > end || end > content.len() {
        return Err(SelectionError::OutOfBounds {
            start,
            end,
            len: content.len(),
        });
    }
    for offset in [start, end] {
        if !content.is_char_boundary(offset) {
            return Err(SelectionError::NotCharBoundary(offset));
        }
    }
    Ok(())
}
