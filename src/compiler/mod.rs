//! Link compilation between authoring bodies and published records.
//!
//! An authoring body references local media with content flags, one per
//! line:
//!
//! ```text
//! <p>The arm in action:</p>
//! !!Content!!:"C:/media/arm.mp4"
//! ```
//!
//! ```text
//!              compile_forward (stage or upload)
//!   body ─────────────────────────────────────────► record text
//!   (content flags)                                  (<video>, <img>, <embed>)
//!        ◄─────────────────────────────────────────
//!              compile_backward (download)
//! ```
//!
//! Both directions rewrite one occurrence at a time and rescan the buffer
//! from the top, so offsets never go stale.

mod backward;
mod error;
mod forward;
mod media;
mod migrate;

pub use error::CompileError;
pub use forward::{CONTENT_FLAG, flagged_paths};
pub use migrate::StagingDir;

use crate::storage::BlobStore;
use std::path::Path;

/// Rewrites media references in both directions against one store.
pub struct LinkCompiler<'s> {
    store: &'s dyn BlobStore,
    staging: StagingDir,
    /// Hosted URL prefix searched for by the backward pass.
    search_text: String,
}

impl<'s> LinkCompiler<'s> {
    pub fn new(store: &'s dyn BlobStore, staging: StagingDir) -> Self {
        Self {
            search_text: store.public_url_prefix(),
            store,
            staging,
        }
    }

    pub fn staging(&self) -> &StagingDir {
        &self.staging
    }

    /// Stage or upload one file, see [`migrate::migrate`].
    pub fn migrate(&self, path: &Path, project_id: &str, to_remote: bool) -> Option<String> {
        migrate::migrate(path, self.store, &self.staging, project_id, to_remote)
    }
}
