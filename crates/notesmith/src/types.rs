//! Result types shared by the extractors.

use serde::{Deserialize, Serialize};

/// Category of a degraded extraction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An image could not be read, decoded, or recognized.
    DecodeFailure,
    /// A PDF could not be opened or one of its pages could not be parsed.
    PdfParseFailure,
}

/// A failure that was absorbed instead of propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::DecodeFailure,
            message: message.into(),
        }
    }

    pub fn pdf_parse_failure(message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::PdfParseFailure,
            message: message.into(),
        }
    }
}

/// Text produced by an extractor together with everything that went wrong on the way.
///
/// Empty `text` means nothing could be recovered; it is never an error on its own.
/// `diagnostics` lets callers distinguish "blank document" from "unreadable document".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Set when a PDF's text came from OCR over its embedded images.
    #[serde(default)]
    pub used_ocr_fallback: bool,
}

impl ExtractionOutcome {
    pub fn has_failures(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Shorten `text` to at most `max_chars` characters for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
