//! Moving referenced media to where a compiled record can reach it.
//!
//! A local (preview) compile copies media into the staging directory and
//! references it relative to the projects directory. A remote compile
//! uploads it under `content/{project_id}/` and references the hosted URL.

use super::{CompileError, media::MediaKind};
use crate::log;
use crate::storage::BlobStore;
use std::fs;
use std::path::{Path, PathBuf};

/// The directory staged and pulled media live in.
#[derive(Debug, Clone)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, the prefix of every staged reference.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `{name}/{file}`
    pub fn reference(&self, file: &str) -> String {
        format!("{}/{file}", self.name())
    }

    /// Remove every entry of the directory except the files in `keep`.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&self, keep: &[PathBuf]) -> Result<usize, CompileError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let keep: Vec<PathBuf> = keep.iter().filter_map(|path| path.canonicalize().ok()).collect();
        let entries =
            fs::read_dir(&self.path).map_err(|err| CompileError::Io(self.path.clone(), err))?;

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|err| CompileError::Io(self.path.clone(), err))?.path();
            if path.canonicalize().is_ok_and(|path| keep.contains(&path)) {
                continue;
            }
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|err| CompileError::Io(path.clone(), err))?;
            removed += 1;
        }

        log!("migrate"; "pruned {removed} stale files from {}", self.path.display());
        Ok(removed)
    }
}

/// Stage or upload `path`, returning the reference to render.
///
/// Missing files and directories are logged and yield `None`, as do copy
/// and upload failures.
pub fn migrate(
    path: &Path,
    store: &dyn BlobStore,
    staging: &StagingDir,
    project_id: &str,
    to_remote: bool,
) -> Option<String> {
    let target = if to_remote { "remote" } else { "local" };
    log!("migrate"; "{} to {target}", path.display());

    if !path.exists() {
        log!("warn"; "file does not exist: {}", path.display());
        return None;
    }
    if path.is_dir() {
        log!("warn"; "directory was passed: {}", path.display());
        return None;
    }
    let file = path.file_name()?.to_string_lossy().into_owned();

    if to_remote {
        let key = format!("content/{project_id}/{file}");
        let content_type = MediaKind::from_path(path).map(MediaKind::content_type);
        return store
            .upload_file(path, &key, content_type)
            .map_err(|err| log!("error"; "upload of {} failed: {err}", path.display()))
            .ok();
    }

    if let Err(err) = fs::create_dir_all(staging.path()) {
        log!("error"; "cannot create {}: {err}", staging.path().display());
        return None;
    }
    let staged = staging.path().join(&file);
    if !is_same_file(path, &staged)
        && let Err(err) = fs::copy(path, &staged)
    {
        log!("error"; "cannot stage {}: {err}", path.display());
        return None;
    }
    Some(staging.reference(&file))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
