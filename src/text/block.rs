//! Block targeting: locating an enclosing `open ... close` span.
//!
//! Given an offset somewhere inside a block, [`locate_block`] walks backward
//! to the nearest open marker from a [`MarkerTable`], then forward to that
//! marker's close token:
//!
//! ```text
//! ABC< viDeo src> HERE ... < /Video > > > >BC
//!    ^ start      ^ near              ^ end (after 3 `>` for "</video>>>")
//! ```
//!
//! Nested blocks of the same kind are not supported.

use super::{TextError, quasi::QuasiKey};
use std::ops::Range;

// ============================================================================
// Span
// ============================================================================

/// Half-open byte range `[start, end)` of a located block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Slice the span out of the text it was located in.
    pub fn isolate<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.range()).unwrap_or_default()
    }

    /// Drop one character from each side, e.g. the quotes around a URL.
    ///
    /// Returns `None` when nothing would be left.
    pub fn shrink(&self, text: &str) -> Option<Span> {
        let inner = self.isolate(text);
        let first = inner.chars().next()?.len_utf8();
        let last = inner.chars().next_back()?.len_utf8();
        let (start, end) = (self.start + first, self.end.checked_sub(last)?);
        (start < end).then_some(Span::new(start, end))
    }
}

// ============================================================================
// Marker Table
// ============================================================================

/// Ordered `(open, close)` marker pairs.
///
/// Order only matters when two open markers match at the same offset; the
/// first pair wins.
#[derive(Debug, Clone, Copy)]
pub struct MarkerTable<'a>(&'a [(&'a str, &'a str)]);

impl<'a> MarkerTable<'a> {
    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        Self(pairs)
    }

    fn keys(&self) -> Result<Vec<(QuasiKey<'a>, QuasiKey<'a>)>, TextError> {
        self.0
            .iter()
            .map(|&(open, close)| Ok((QuasiKey::new(open)?, QuasiKey::new(close)?)))
            .collect()
    }
}

// ============================================================================
// Locating
// ============================================================================

/// Locate the block enclosing `near`.
///
/// The nearest open marker at or before `near` wins. The close marker is
/// searched after it, and the end is pushed past as many occurrences of the
/// close marker's last character as that marker itself contains.
pub fn locate_block(text: &str, near: usize, table: MarkerTable<'_>) -> Result<Span, TextError> {
    let markers = table.keys()?;
    let near = near.min(text.len());

    let (start, close) = (0..=near)
        .rev()
        .filter(|&offset| text.is_char_boundary(offset))
        .find_map(|offset| {
            markers
                .iter()
                .find(|(open, _)| open.matches_at(text, offset))
                .map(|&(_, close)| (offset, close))
        })
        .ok_or_else(|| TextError::BlockNotFound(format!("no open marker at or before {near}")))?;

    let after_open = start + text[start..].chars().next().map_or(1, char::len_utf8);
    let close_at = close.find_in(text, after_open).ok_or_else(|| {
        TextError::BlockNotFound(format!("`{}` not found after {start}", close.as_str()))
    })?;

    let end = quasi_end(text, close.as_str(), close_at).ok_or_else(|| {
        TextError::BlockNotFound(format!("`{}` is not terminated", close.as_str()))
    })?;

    Ok(Span::new(start, end))
}

/// Walk past the close marker's trailing character.
///
/// Counts how often the last character of `close` appears in `close`, then
/// consumes that many literal occurrences from `from` onward. The consumed
/// characters are not required to be contiguous.
fn quasi_end(text: &str, close: &str, from: usize) -> Option<usize> {
    let last = close.chars().next_back()?;
    let count = close.matches(last).count();

    let mut index = from;
    for _ in 0..count {
        index += text.get(index..)?.find(last)? + last.len_utf8();
    }
    Some(index)
}

/// Text between the first ASCII-case-insensitive `from` and the next `to`.
///
/// Runs to the end of the text when `to` does not follow.
pub fn parse_block<'t>(text: &'t str, from: &str, to: &str) -> Option<&'t str> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find(&from.to_ascii_lowercase())? + from.len();
    let end = lower[start..]
        .find(&to.to_ascii_lowercase())
        .map_or(text.len(), |offset| start + offset);
    text.get(start..end)
}
