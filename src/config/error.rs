//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("folio.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io_err.to_string(), "IO error when reading `folio.toml`");

        let validation_err = ConfigError::Validation("[storage.bucket] is required".into());
        assert!(validation_err.to_string().ends_with("[storage.bucket] is required"));
    }
}
