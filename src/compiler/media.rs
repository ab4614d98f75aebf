//! Media vocabulary: what a content flag may point at, and how it renders.

use crate::text::MarkerTable;
use std::path::Path;

/// Token in a template that is replaced by the media reference.
pub const PLACEHOLDER: &str = "=!=HERE=!=";

/// Published elements that may carry a hosted URL, with their close markers.
pub const HTML_ELEMENTS: MarkerTable<'static> =
    MarkerTable::new(&[("<video", "</video>"), ("<embed", ">"), ("<img", ">")]);

/// Quote characters delimiting an attribute value.
pub const QUOTES: MarkerTable<'static> = MarkerTable::new(&[("\"", "\""), ("'", "'")]);

/// Supported media, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Mp4,
    Mov,
    Pdf,
    Png,
    Jpg,
    Jpeg,
}

impl MediaKind {
    /// Look up a (case-insensitive) extension without the dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "mov" => Some(Self::Mov),
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// HTML template with a single [`PLACEHOLDER`].
    pub const fn template(self) -> &'static str {
        match self {
            Self::Mp4 => "<video controls><source src='=!=HERE=!=' type='video/mp4'>Your browser does not support the video tag.</video>",
            Self::Mov => "<video controls><source src='=!=HERE=!='>Your browser does not support the video tag.</video>",
            Self::Pdf => "<embed src='=!=HERE=!=' type='application/pdf'>",
            Self::Png | Self::Jpg | Self::Jpeg => "<img src='=!=HERE=!='>",
        }
    }

    /// Render the template around a staged path or hosted URL.
    pub fn render(self, reference: &str) -> String {
        self.template().replacen(PLACEHOLDER, reference, 1)
    }

    /// MIME type sent along with uploads.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::Mov => "video/quicktime",
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }
}
