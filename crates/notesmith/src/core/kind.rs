//! Document kind resolution.
//!
//! Kinds are decided purely from the declared name or extension. The file
//! contents are never sniffed, so a PNG renamed to `.pdf` goes down the PDF path.

use crate::{NotesmithError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Raster formats accepted as standalone documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Png,
    Jpeg,
    Bmp,
}

/// The two extraction paths a document can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Image(ImageKind),
}

/// Extensions accepted by [`DocumentKind::from_hint`], lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "bmp"];

impl DocumentKind {
    /// Resolve a kind from a file name, a path, or a dotted extension.
    ///
    /// Only the text after the last `.` is considered, case-insensitively, so
    /// `"scan.PDF"` and `".pdf"` both resolve to [`DocumentKind::Pdf`]. A hint
    /// with no dot at all (an upload literally named `pdf`) is not an extension.
    ///
    /// # Errors
    ///
    /// Returns [`NotesmithError::UnsupportedFormat`] for anything outside
    /// [`SUPPORTED_EXTENSIONS`], including names without an extension.
    pub fn from_hint(hint: &str) -> Result<Self> {
        let hint = hint.trim();
        hint.rsplit_once('.')
            .and_then(|(_, extension)| Self::from_extension(extension))
            .ok_or_else(|| {
                NotesmithError::UnsupportedFormat(if hint.is_empty() {
                    "no file name or extension given".to_string()
                } else {
                    hint.to_string()
                })
            })
    }

    /// Resolve a kind from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| NotesmithError::UnsupportedFormat(path.display().to_string()))
    }

    /// Resolve a bare extension (`"pdf"`, `"JPG"`) with no leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Image(ImageKind::Png)),
            "jpg" | "jpeg" => Some(Self::Image(ImageKind::Jpeg)),
            "bmp" => Some(Self::Image(ImageKind::Bmp)),
            _ => None,
        }
    }

    /// Canonical extension, used when persisting uploads.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image(ImageKind::Png) => "png",
            Self::Image(ImageKind::Jpeg) => "jpg",
            Self::Image(ImageKind::Bmp) => "bmp",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
