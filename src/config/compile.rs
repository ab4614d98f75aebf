//! `[compile]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[compile]` section in folio.toml - project record generation.
///
/// # Example
/// ```toml
/// [compile]
/// minify = true
/// icon_size = 4
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
    /// Collapse whitespace in `projectText` and sitemap.xml.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Technology icon size in `em`.
    #[serde(default = "defaults::compile::icon_size")]
    #[educe(Default = defaults::compile::icon_size())]
    pub icon_size: u32,
}

#[cfg(test)]
mod tests {
    use super::super::FolioConfig;

    #[test]
    fn test_compile_config() {
        let config: FolioConfig = toml::from_str(
            r#"
            [compile]
            minify = false
            icon_size = 6
        "#,
        )
        .unwrap();

        assert!(!config.compile.minify);
        assert_eq!(config.compile.icon_size, 6);
    }

    #[test]
    fn test_compile_defaults() {
        let config: FolioConfig = toml::from_str("").unwrap();

        assert!(config.compile.minify);
        assert_eq!(config.compile.icon_size, 4);
    }

    #[test]
    fn test_negative_icon_size_rejected() {
        let result: Result<FolioConfig, _> = toml::from_str("[compile]\nicon_size = -1");
        assert!(result.is_err());
    }
}
