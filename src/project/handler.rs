//! Moving project records between the projects directory and the store.
//!
//! Store keys:
//!
//! ```text
//! projects/{name}.json        record
//! content/{id}/{file}         media uploaded by a remote compile
//! ```
//!
//! Storage failures are logged here and reported as `None`, `false` or an
//! empty listing.

use super::{ProjectError, project_id};
use crate::log;
use crate::storage::{BlobStore, folder_key};
use std::path::{Path, PathBuf};

/// Store folder holding project records.
const PROJECTS_FOLDER: &str = "projects";
/// Store folder holding uploaded media, one subfolder per project.
const CONTENT_FOLDER: &str = "content";

pub struct ProjectHandler<'s> {
    store: &'s dyn BlobStore,
    projects_dir: PathBuf,
}

impl<'s> ProjectHandler<'s> {
    pub fn new(store: &'s dyn BlobStore, projects_dir: &Path) -> Self {
        Self {
            store,
            projects_dir: projects_dir.to_path_buf(),
        }
    }

    /// Local path of a record.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.projects_dir.join(name)
    }

    /// Record names in the store, without the `projects/` prefix.
    pub fn list_projects(&self) -> Vec<String> {
        let folder = folder_key(PROJECTS_FOLDER);
        match self.store.list_directory(&folder) {
            Ok(keys) => keys
                .iter()
                .filter_map(|key| key.strip_prefix(&folder))
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
            Err(err) => {
                log!("error"; "listing {folder} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Download a record into the projects directory.
    pub fn pull_project(&self, name: &str) -> Option<PathBuf> {
        let local = self.record_path(name);
        match self.store.download_file(&record_key(name), &local) {
            Ok(()) => Some(local),
            Err(err) => {
                log!("error"; "pulling {name} failed: {err}");
                None
            }
        }
    }

    /// Upload the local record, returning its URL.
    ///
    /// Creates the `projects/` folder first on an empty store.
    pub fn upload_project(&self, name: &str) -> Result<Option<String>, ProjectError> {
        let local = self.record_path(name);
        if !local.is_file() {
            return Err(ProjectError::Io(
                local,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }

        if self.list_projects().is_empty()
            && let Err(err) = self.store.create_folder(PROJECTS_FOLDER)
        {
            log!("error"; "creating {PROJECTS_FOLDER}/ failed: {err}");
        }

        match self.store.upload_file(&local, &record_key(name), Some("application/json")) {
            Ok(url) => Ok(Some(url)),
            Err(err) => {
                log!("error"; "uploading {name} failed: {err}");
                Ok(None)
            }
        }
    }

    /// Delete a record and every media object uploaded for it.
    ///
    /// Returns whether both deletions went through.
    pub fn remove_project(&self, name: &str) -> bool {
        let content = format!("{CONTENT_FOLDER}/{}", project_id(name));

        let record = self.store.delete_file(&record_key(name)).map_err(|err| {
            log!("error"; "deleting record {name} failed: {err}");
        });
        let media = self.store.delete_folder(&content).map_err(|err| {
            log!("error"; "deleting {content}/ failed: {err}");
        });

        record.is_ok() && media.is_ok()
    }
}

fn record_key(name: &str) -> String {
    format!("{PROJECTS_FOLDER}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalStore, PathBuf) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(&dir.path().join("bucket"), "b", "us-east-2");
        let projects = dir.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        (dir, store, projects)
    }

    #[test]
    fn test_upload_then_list() {
        let (_dir, store, projects) = setup();
        let handler = ProjectHandler::new(&store, &projects);
        assert!(handler.list_projects().is_empty());

        fs::write(projects.join("cobot.json"), "{}").unwrap();
        fs::write(projects.join("lidar.json"), "{}").unwrap();
        let url = handler.upload_project("cobot.json").unwrap();
        handler.upload_project("lidar.json").unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://b.s3.us-east-2.amazonaws.com/projects/cobot.json")
        );
        assert_eq!(handler.list_projects(), vec!["cobot.json", "lidar.json"]);
    }

    #[test]
    fn test_upload_missing_record() {
        let (_dir, store, projects) = setup();
        let handler = ProjectHandler::new(&store, &projects);
        assert!(matches!(handler.upload_project("gone.json"), Err(ProjectError::Io(..))));
    }

    #[test]
    fn test_pull() {
        let (dir, store, projects) = setup();
        let source = dir.path().join("cobot.json");
        fs::write(&source, "{\"tags\":[]}").unwrap();
        store.upload_file(&source, "projects/cobot.json", None).unwrap();
        let handler = ProjectHandler::new(&store, &projects);

        let local = handler.pull_project("cobot.json");
        assert_eq!(local, Some(projects.join("cobot.json")));
        assert_eq!(fs::read_to_string(projects.join("cobot.json")).unwrap(), "{\"tags\":[]}");

        assert_eq!(handler.pull_project("gone.json"), None);
    }

    #[test]
    fn test_remove() {
        let (dir, store, projects) = setup();
        let source = dir.path().join("a.png");
        fs::write(&source, b"png").unwrap();
        store.upload_file(&source, "projects/cobot.json", None).unwrap();
        store.upload_file(&source, "content/cobot/a.png", None).unwrap();
        store.upload_file(&source, "content/lidar/a.png", None).unwrap();
        let handler = ProjectHandler::new(&store, &projects);

        assert!(handler.remove_project("cobot.json"));
        assert_eq!(store.list_directory("").unwrap(), vec!["content/lidar/a.png"]);

        // the record is already gone
        assert!(!handler.remove_project("cobot.json"));
    }
}
