//! Configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[site]`    | Published site (base URL for the sitemap)      |
//! | `[paths]`   | Local records, staging directory, body file    |
//! | `[compile]` | Minification and icon size                     |
//! | `[storage]` | Bucket, region and credentials                 |
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com/"
//!
//! [paths]
//! projects = "projects"
//!
//! [storage]
//! bucket = "my-public-files"
//! region = "us-east-2"
//! ```

mod compile;
pub mod defaults;
mod error;
mod paths;
mod site;
mod storage;

pub use error::ConfigError;
pub use storage::{StorageBackend, StorageConfig};

use crate::cli::{Cli, Commands};
use crate::log;
use compile::CompileConfig;
use educe::Educe;
use paths::PathsConfig;
use serde::{Deserialize, Serialize};
use site::SiteSection;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl FolioConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `folio.toml` under the CLI root, falling back to defaults when
    /// it does not exist, then apply CLI overrides and validate.
    pub fn load(cli: &'static Cli) -> Result<Self, ConfigError> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let path = root.join(&cli.config);
        let found = path.exists();

        let mut config = if found { Self::from_path(&path)? } else { Self::default() };
        config.update_with_cli(cli);
        if !found {
            log!("warn"; "{} not found, using defaults", config.config_path.display());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn get_root(&self) -> &Path {
        self.paths.root.as_deref().unwrap_or(Path::new("./"))
    }

    pub fn set_root(&mut self, path: &Path) {
        self.paths.root = Some(path.to_path_buf())
    }

    /// Directory holding local project records.
    pub fn projects_dir(&self) -> &Path {
        &self.paths.projects
    }

    /// Staging directory for staged and pulled media.
    pub fn staging_dir(&self) -> PathBuf {
        self.paths.projects.join(&self.paths.staging)
    }

    /// Authoring body file.
    pub fn body_path(&self) -> PathBuf {
        self.paths.projects.join(&self.paths.body)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.update_path_with_root(&root, &cli.config);

        Self::update_option(&mut self.compile.minify, cli.minify().as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Rebase all paths on `root` and normalize them to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config));
        self.paths.projects = Self::normalize_path(&root.join(&self.paths.projects));
        self.storage.local_root = Self::normalize_path(&root.join(&self.storage.local_root));

        let expanded = shellexpand::tilde(&self.storage.credentials.to_string_lossy()).into_owned();
        let credentials = PathBuf::from(expanded);
        self.storage.credentials = if credentials.is_relative() {
            Self::normalize_path(&root.join(credentials))
        } else {
            credentials
        };
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.site.url
            && !url.starts_with("http")
        {
            return Err(ConfigError::Validation(
                "[site.url] must start with http:// or https://".into(),
            ));
        }

        if self.compile.icon_size == 0 {
            return Err(ConfigError::Validation(
                "[compile.icon_size] must be greater than 0".into(),
            ));
        }

        if self.paths.staging.is_empty() || self.paths.staging.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "[paths.staging] must be a single directory name".into(),
            ));
        }

        let Some(cli) = self.cli else {
            return Ok(());
        };

        if cli.is_sitemap() && self.site.url.is_none() {
            return Err(ConfigError::Validation(
                "[site.url] is required for sitemap generation".into(),
            ));
        }

        if !cli.is_offline() && self.storage.bucket.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[storage.bucket] is required for this command".into(),
            ));
        }

        if let Commands::Sitemap { dir: Some(dir) } = &cli.command
            && !self.get_root().join(dir).is_dir()
        {
            return Err(ConfigError::Validation(format!(
                "sitemap directory `{}` not found",
                dir.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
