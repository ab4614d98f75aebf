//! Sitemap generation.
//!
//! Walks a built site and lists every `.html` file for search engine
//! indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/projects/project.html</loc>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    log,
    utils::minify::{MinifyType, minify},
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::{fs, path::Path};
use walkdir::WalkDir;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Output file name, written into the scanned directory.
const SITEMAP_FILE: &str = "sitemap.xml";

// ============================================================================
// Public API
// ============================================================================

/// Scan `dir` and write `dir/sitemap.xml`.
pub fn build_sitemap(dir: &Path, base_url: &str, minify_xml: bool) -> Result<()> {
    let sitemap = Sitemap::scan(dir, base_url);
    let count = sitemap.urls.len();
    let xml = sitemap.into_xml();
    let xml = minify(MinifyType::Xml(&xml), minify_xml);

    let sitemap_path = dir.join(SITEMAP_FILE);
    fs::write(&sitemap_path, xml.as_bytes())
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

    log!("sitemap"; "{} pages written to {}", count, sitemap_path.display());
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

struct Sitemap {
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (YYYY-MM-DD)
    lastmod: Option<String>,
}

impl Sitemap {
    /// Collect every `.html` file under `dir`, sorted by path.
    fn scan(dir: &Path, base_url: &str) -> Self {
        let mut urls: Vec<UrlEntry> = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(dir).ok()?;
                let lastmod = entry
                    .metadata()
                    .ok()
                    .and_then(|meta| meta.modified().ok())
                    .map(|time| DateTime::<Utc>::from(time).format("%Y-%m-%d").to_string());
                Some(UrlEntry {
                    loc: join_url(base_url, &relative.to_string_lossy()),
                    lastmod,
                })
            })
            .collect();
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));
        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Join a base URL and a relative file path with exactly one `/`.
fn join_url(base_url: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    format!("{}/{}", base_url.trim_end_matches('/'), relative.trim_start_matches('/'))
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
