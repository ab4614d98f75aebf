//! Directory-backed store.
//!
//! Objects live at `{root}/{key}`. URLs use the same hosted shape as S3 so
//! that records compiled against it round-trip through the backward
//! compiler.

use super::{BlobStore, StorageError, folder_key, hosted_prefix, normalize_key};
use crate::log;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct LocalStore {
    root: PathBuf,
    prefix: String,
}

impl LocalStore {
    pub fn new(root: &Path, bucket: &str, region: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            prefix: hosted_prefix(bucket, region),
        }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(normalize_key(key))
    }
}

fn copy_creating_parent(from: &Path, to: &Path) -> Result<(), StorageError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|err| StorageError::Io(parent.to_path_buf(), err))?;
    }
    fs::copy(from, to).map_err(|err| StorageError::Io(from.to_path_buf(), err))?;
    Ok(())
}

impl BlobStore for LocalStore {
    fn public_url_prefix(&self) -> String {
        self.prefix.clone()
    }

    fn upload_file(
        &self,
        local: &Path,
        key: &str,
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        copy_creating_parent(local, &self.object_path(key))?;
        log!("storage"; "uploaded {} to {}", local.display(), normalize_key(key));
        Ok(self.object_url(key))
    }

    fn download_file(&self, key: &str, local: &Path) -> Result<(), StorageError> {
        copy_creating_parent(&self.object_path(key), local)?;
        log!("storage"; "downloaded {} to {}", normalize_key(key), local.display());
        Ok(())
    }

    fn list_directory(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let prefix = normalize_key(prefix);
        let mut keys: Vec<String> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                Some(normalize_key(&relative.to_string_lossy()))
            })
            .filter(|key| key.starts_with(&prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn create_folder(&self, name: &str) -> Result<(), StorageError> {
        let folder = folder_key(name);
        let path = self.object_path(&folder);
        fs::create_dir_all(&path).map_err(|err| StorageError::Io(path, err))?;
        log!("storage"; "folder {folder} created");
        Ok(())
    }

    fn delete_file(&self, key: &str) -> Result<(), StorageError> {
        let path = self.object_path(key);
        fs::remove_file(&path).map_err(|err| StorageError::Io(path, err))?;
        log!("storage"; "deleted {}", normalize_key(key));
        Ok(())
    }

    fn delete_folder(&self, prefix: &str) -> Result<(), StorageError> {
        let folder = folder_key(prefix);
        let path = self.object_path(&folder);
        if !path.exists() {
            log!("storage"; "folder {folder} is empty or does not exist");
            return Ok(());
        }
        fs::remove_dir_all(&path).map_err(|err| StorageError::Io(path, err))?;
        log!("storage"; "folder {folder} and its contents deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(&dir.path().join("bucket"), "b", "us-east-2");
        (dir, store)
    }

    #[test]
    fn test_upload_download_roundtrip() {
        let (dir, store) = store();
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();

        let url = store.upload_file(&source, "content/p/a.png", None).unwrap();
        assert_eq!(url, "https://b.s3.us-east-2.amazonaws.com/content/p/a.png");

        let target = dir.path().join("out/nested/a.png");
        store.download_file("content/p/a.png", &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"png");
    }

    #[test]
    fn test_download_url_to_directory() {
        let (dir, store) = store();
        let source = dir.path().join("clip.mp4");
        fs::write(&source, b"mp4").unwrap();
        let url = store.upload_file(&source, r"content\p\clip.mp4", None).unwrap();

        let local = store.download_url_to_directory(&url, &dir.path().join("temp")).unwrap();
        assert_eq!(local, dir.path().join("temp/clip.mp4"));
        assert!(local.exists());
    }

    #[test]
    fn test_download_foreign_url() {
        let (dir, store) = store();
        let err = store
            .download_url_to_directory("https://example.com/a.png", dir.path())
            .unwrap_err();
        assert!(matches!(err, StorageError::ForeignUrl(_)));
    }

    #[test]
    fn test_list_and_delete() {
        let (dir, store) = store();
        let source = dir.path().join("x.json");
        fs::write(&source, b"{}").unwrap();
        store.upload_file(&source, "projects/x.json", None).unwrap();
        store.upload_file(&source, "projects/y.json", None).unwrap();
        store.upload_file(&source, "content/x/a.png", None).unwrap();

        assert_eq!(
            store.list_directory("projects").unwrap(),
            vec!["projects/x.json", "projects/y.json"]
        );

        store.delete_file("projects/y.json").unwrap();
        store.delete_folder("content/x").unwrap();
        assert_eq!(store.list_directory("").unwrap(), vec!["projects/x.json"]);
    }

    #[test]
    fn test_create_folder() {
        let (dir, store) = store();
        store.create_folder("projects").unwrap();
        assert!(dir.path().join("bucket/projects").is_dir());
        assert!(store.list_directory("projects").unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_root() {
        let (_dir, store) = store();
        assert!(store.list_directory("projects").unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_file_is_error() {
        let (_dir, store) = store();
        assert!(matches!(store.delete_file("nope"), Err(StorageError::Io(..))));
    }
}
