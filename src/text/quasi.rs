//! Whitespace- and case-insensitive literal matching.
//!
//! A key matches at an offset when its characters appear in order from that
//! offset, with any run of spaces allowed before each character and case
//! ignored. The match may never *start* on a space.
//!
//! ```text
//! "< VIdeo src>"  matches "<video" at 0
//! " <video"       does not match "<video" at 0
//! ```

use super::TextError;

/// The only character skipped between key characters.
const SKIP: char = ' ';

/// A validated quasi-match key: non-empty, no spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuasiKey<'a>(&'a str);

impl<'a> QuasiKey<'a> {
    /// Validate a key.
    pub fn new(key: &'a str) -> Result<Self, TextError> {
        if key.is_empty() || key.contains(SKIP) {
            return Err(TextError::InvalidArgument(key.to_owned()));
        }
        Ok(Self(key))
    }

    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Check whether `text` holds this key at `offset`.
    ///
    /// Returns `false` when `offset` is out of range or not on a char boundary.
    pub fn matches_at(&self, text: &str, offset: usize) -> bool {
        let Some(rest) = text.get(offset..) else {
            return false;
        };
        let mut chars = rest.chars().peekable();
        if chars.peek() == Some(&SKIP) {
            return false;
        }

        for key_char in self.0.chars() {
            let Some(c) = chars.by_ref().find(|&c| c != SKIP) else {
                return false;
            };
            if !eq_ignore_case(c, key_char) {
                return false;
            }
        }
        true
    }

    /// Leftmost offset `>= from` where this key matches.
    pub fn find_in(&self, text: &str, from: usize) -> Option<usize> {
        let rest = text.get(from..)?;
        rest.char_indices()
            .map(|(index, _)| from + index)
            .find(|&offset| self.matches_at(text, offset))
    }
}

/// Check whether `text` holds `key` at `offset`, ignoring spaces and case.
pub fn quasi_equal_at(text: &str, offset: usize, key: &str) -> Result<bool, TextError> {
    Ok(QuasiKey::new(key)?.matches_at(text, offset))
}

/// Find the first offset `>= from` where `key` quasi-matches.
pub fn quasi_find(text: &str, key: &str, from: usize) -> Result<Option<usize>, TextError> {
    Ok(QuasiKey::new(key)?.find_in(text, from))
}

#[inline]
fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
