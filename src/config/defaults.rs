//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn url() -> Option<String> {
        None
    }
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn projects() -> PathBuf {
        "projects".into()
    }

    pub fn staging() -> String {
        "temp".into()
    }

    pub fn body() -> String {
        "proj.html".into()
    }
}

// ============================================================================
// [compile] Section Defaults
// ============================================================================

pub mod compile {
    pub fn icon_size() -> u32 {
        4
    }
}

// ============================================================================
// [storage] Section Defaults
// ============================================================================

pub mod storage {
    use std::path::PathBuf;

    pub fn region() -> String {
        "us-east-2".into()
    }

    pub fn profile() -> String {
        "personal".into()
    }

    pub fn credentials() -> PathBuf {
        "~/.aws/credentials".into()
    }

    pub fn local_root() -> PathBuf {
        "bucket".into()
    }

    pub fn timeout_secs() -> u64 {
        30
    }
}
