//! Link compiler error types.

use crate::text::TextError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    /// A content flag points at a file with no media template.
    #[error("unsupported media type `{extension}` in `{path}`")]
    UnsupportedMediaType { extension: String, path: String },

    /// A content flag points at a file that could not be staged or uploaded.
    #[error("content `{0}` could not be migrated")]
    MissingContent(String),

    /// The buffer no longer holds what was just located in it.
    #[error("compile integrity check failed: {0}")]
    CompileIntegrity(String),

    #[error(transparent)]
    Text(#[from] TextError),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}
