//! `[storage]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where records and media are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// An S3 bucket.
    #[default]
    S3,
    /// A local directory standing in for a bucket.
    Local,
}

/// `[storage]` section in folio.toml.
///
/// # Example
/// ```toml
/// [storage]
/// backend = "s3"
/// bucket = "my-public-files"
/// region = "us-east-2"
/// profile = "personal"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Bucket name. Required by every command that touches storage.
    #[serde(default)]
    pub bucket: String,

    #[serde(default = "defaults::storage::region")]
    #[educe(Default = defaults::storage::region())]
    pub region: String,

    /// Profile looked up in the shared credentials file.
    #[serde(default = "defaults::storage::profile")]
    #[educe(Default = defaults::storage::profile())]
    pub profile: String,

    /// Shared credentials file; `~` is expanded.
    #[serde(default = "defaults::storage::credentials")]
    #[educe(Default = defaults::storage::credentials())]
    pub credentials: PathBuf,

    /// Bucket directory for `backend = "local"`, relative to the root.
    #[serde(default = "defaults::storage::local_root")]
    #[educe(Default = defaults::storage::local_root())]
    pub local_root: PathBuf,

    /// HTTP timeout for a single request.
    #[serde(default = "defaults::storage::timeout_secs")]
    #[educe(Default = defaults::storage::timeout_secs())]
    pub timeout_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::super::FolioConfig;
    use super::*;

    #[test]
    fn test_storage_config() {
        let config: FolioConfig = toml::from_str(
            r#"
            [storage]
            backend = "local"
            bucket = "public-files"
            region = "eu-west-1"
            profile = "work"
            credentials = "/etc/aws/credentials"
            local_root = "mirror"
            timeout_secs = 5
        "#,
        )
        .unwrap();

        let storage = &config.storage;
        assert_eq!(storage.backend, StorageBackend::Local);
        assert_eq!(storage.bucket, "public-files");
        assert_eq!(storage.region, "eu-west-1");
        assert_eq!(storage.profile, "work");
        assert_eq!(storage.credentials, PathBuf::from("/etc/aws/credentials"));
        assert_eq!(storage.local_root, PathBuf::from("mirror"));
        assert_eq!(storage.timeout_secs, 5);
    }

    #[test]
    fn test_storage_defaults() {
        let config: FolioConfig = toml::from_str("").unwrap();
        let storage = &config.storage;

        assert_eq!(storage.backend, StorageBackend::S3);
        assert_eq!(storage.bucket, "");
        assert_eq!(storage.region, "us-east-2");
        assert_eq!(storage.profile, "personal");
        assert_eq!(storage.credentials, PathBuf::from("~/.aws/credentials"));
        assert_eq!(storage.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_backend() {
        let result: Result<FolioConfig, _> = toml::from_str("[storage]\nbackend = \"gcs\"");
        assert!(result.is_err());
    }
}
