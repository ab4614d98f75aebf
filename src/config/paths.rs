//! `[paths]` section configuration.
//!
//! ```text
//! {root}/
//!   └── {projects}/            local project records (*.json)
//!         ├── {body}           authoring body, proj.html by default
//!         └── {staging}/       staged and pulled media, temp/ by default
//! ```

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[paths]` section in folio.toml.
///
/// # Example
/// ```toml
/// [paths]
/// projects = "projects"
/// staging = "temp"
/// body = "proj.html"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root; set from `--root` or the current directory.
    #[serde(skip)]
    #[educe(Default = defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Directory holding local project records.
    #[serde(default = "defaults::paths::projects")]
    #[educe(Default = defaults::paths::projects())]
    pub projects: PathBuf,

    /// Staging directory name, inside `projects`.
    ///
    /// Locally compiled records reference media as `{staging}/{file}`, so
    /// this is also the relative URL prefix seen by the preview page.
    #[serde(default = "defaults::paths::staging")]
    #[educe(Default = defaults::paths::staging())]
    pub staging: String,

    /// Authoring body file name, inside `projects`.
    #[serde(default = "defaults::paths::body")]
    #[educe(Default = defaults::paths::body())]
    pub body: String,
}
