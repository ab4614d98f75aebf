//! The published project record, as read by the site's project loader.

use super::ProjectError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One `projects/{name}.json` object. Field order is the serialized order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectRecord {
    pub project_short_title: String,
    pub project_long_title: String,
    /// `<img src="...">`
    pub project_image: String,
    /// `<p>...</p>`
    pub project_description: String,
    /// Inline SVG icons.
    pub applicable_technologies: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_link: Option<String>,
    /// Compiled, minified body.
    pub project_text: String,
}

impl ProjectRecord {
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content =
            fs::read_to_string(path).map_err(|err| ProjectError::Io(path.to_path_buf(), err))?;
        serde_json::from_str(&content).map_err(|err| ProjectError::Json(path.to_path_buf(), err))
    }

    /// Overwrite `path` with this record.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let json =
            serde_json::to_string(self).map_err(|err| ProjectError::Json(path.to_path_buf(), err))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ProjectError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(path, json).map_err(|err| ProjectError::Io(path.to_path_buf(), err))
    }
}
