//! `[site]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in folio.toml - the published website.
///
/// # Example
/// ```toml
/// [site]
/// url = "https://example.com/"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Base URL prepended to every `<loc>` in sitemap.xml.
    /// Required by `folio sitemap`.
    #[serde(default = "defaults::site::url")]
    #[educe(Default = defaults::site::url())]
    pub url: Option<String>,
}
