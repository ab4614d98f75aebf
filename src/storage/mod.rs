//! Object storage for project records and their media.
//!
//! [`BlobStore`] is the only seam the compiler and project handler see. Two
//! implementations exist:
//!
//! - [`S3Store`]: an S3 bucket over the REST API, signed with SigV4
//! - [`LocalStore`]: a directory standing in for a bucket
//!
//! Both advertise hosted URLs of the form
//! `https://{bucket}.s3.{region}.amazonaws.com/{key}`, which is what the
//! backward compiler searches for.
//!
//! Store methods return [`StorageError`]; callers log it and degrade to
//! `None` or an empty listing instead of aborting.

mod credentials;
mod local;
mod s3;
mod sigv4;

pub use local::LocalStore;
pub use s3::S3Store;

use crate::config::{StorageBackend, StorageConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised at the storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no credentials found for profile `{0}`")]
    Credentials(String),

    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} `{key}` returned status {status}")]
    Status {
        method: String,
        key: String,
        status: u16,
    },

    #[error("malformed listing response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("`{0}` is not hosted by this store")]
    ForeignUrl(String),

    #[error("IO error on `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Opaque key-value blob storage.
///
/// Keys always use `/` separators.
pub trait BlobStore {
    /// Scheme and host every object URL starts with, without trailing slash.
    fn public_url_prefix(&self) -> String;

    /// Upload a local file, returning its public URL.
    fn upload_file(
        &self,
        local: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Download an object, creating parent directories of `local`.
    fn download_file(&self, key: &str, local: &Path) -> Result<(), StorageError>;

    /// Keys starting with `prefix`.
    fn list_directory(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Create an empty `name/` folder marker.
    fn create_folder(&self, name: &str) -> Result<(), StorageError>;

    fn delete_file(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every object under `prefix/`.
    fn delete_folder(&self, prefix: &str) -> Result<(), StorageError>;

    /// Public URL of a key.
    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_prefix(), normalize_key(key))
    }

    /// Download a hosted URL into `dir`, keeping the file name.
    fn download_url_to_directory(&self, url: &str, dir: &Path) -> Result<PathBuf, StorageError> {
        let key = key_from_url(url, &self.public_url_prefix())
            .ok_or_else(|| StorageError::ForeignUrl(url.to_owned()))?;
        let local = dir.join(file_name_of(key));
        self.download_file(key, &local)?;
        Ok(local)
    }
}

/// `https://{bucket}.s3.{region}.amazonaws.com`
pub fn hosted_prefix(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com")
}

/// Replace host path separators with `/`.
pub fn normalize_key(key: &str) -> String {
    key.replace('\\', "/")
}

/// Ensure a folder prefix ends with `/`.
pub fn folder_key(name: &str) -> String {
    let name = normalize_key(name);
    if name.ends_with('/') { name } else { format!("{name}/") }
}

/// Object key of a hosted URL, if it belongs to `prefix`.
pub fn key_from_url<'u>(url: &'u str, prefix: &str) -> Option<&'u str> {
    let key = url.strip_prefix(prefix)?.trim_start_matches('/');
    (!key.is_empty()).then_some(key)
}

/// Last `/`-separated segment of a key or URL.
pub fn file_name_of(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Open the store selected in `[storage]`.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn BlobStore>, StorageError> {
    Ok(match config.backend {
        StorageBackend::S3 => Box::new(S3Store::from_config(config)?),
        StorageBackend::Local => Box::new(LocalStore::new(
            &config.local_root,
            &config.bucket,
            &config.region,
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_prefix() {
        assert_eq!(
            hosted_prefix("my-bucket", "us-east-2"),
            "https://my-bucket.s3.us-east-2.amazonaws.com"
        );
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key(r"content\proj\a.png"), "content/proj/a.png");
    }

    #[test]
    fn test_folder_key() {
        assert_eq!(folder_key("projects"), "projects/");
        assert_eq!(folder_key("projects/"), "projects/");
    }

    #[test]
    fn test_key_from_url() {
        let prefix = hosted_prefix("b", "r");
        let url = format!("{prefix}/content/p/a.png");
        assert_eq!(key_from_url(&url, &prefix), Some("content/p/a.png"));
        assert_eq!(key_from_url("https://elsewhere.com/a.png", &prefix), None);
        assert_eq!(key_from_url(&prefix, &prefix), None);
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("content/p/a.png"), "a.png");
        assert_eq!(file_name_of("a.png"), "a.png");
    }
}
