//! Tolerant text scanning over hand-typed HTML.
//!
//! Authored markup is inconsistently spaced and cased (`< VIDEO`, `<video`),
//! so nothing here uses a real HTML parser. Instead:
//!
//! - [`quasi`] matches a literal key while skipping interior spaces and case
//! - [`block`] finds the nearest enclosing open marker and its close marker
//!
//! All offsets are byte offsets into the text and always sit on `char`
//! boundaries.

mod block;
mod quasi;

pub use block::{MarkerTable, Span, locate_block, parse_block};
pub use quasi::{quasi_equal_at, quasi_find};

use thiserror::Error;

/// Errors raised while scanning text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TextError {
    /// A quasi key was empty or contained a space.
    #[error("invalid quasi key `{0}`: keys must be non-empty and contain no spaces")]
    InvalidArgument(String),

    /// No matching open/close marker pair could be found.
    #[error("block not found: {0}")]
    BlockNotFound(String),
}
