//! PDF text extraction with OCR fallback.

use std::path::{Path, PathBuf};

use super::image::ImageTextExtractor;
use crate::pdf::images::PdfImageExtractor;
use crate::pdf::text::read_text_layer;
use crate::types::{Diagnostic, ExtractionOutcome};

/// Extracts a PDF's text layer, falling back to OCR of its embedded images.
///
/// The fallback runs only when the text layer of the *whole* document is empty.
/// A document where some pages have text and others are scans returns the text
/// pages only; the scanned pages are not OCR'd.
///
/// Never fails. A PDF that cannot be opened yields `""`; one that breaks part
/// way through yields the text gathered up to that point.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    images: PdfImageExtractor,
    ocr: ImageTextExtractor,
}

impl PdfTextExtractor {
    pub fn new(ocr: ImageTextExtractor) -> Self {
        Self {
            images: PdfImageExtractor::new(),
            ocr,
        }
    }

    /// Materialize fallback images under `scratch_dir` instead of the system temp dir.
    pub fn with_scratch_dir(ocr: ImageTextExtractor, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            images: PdfImageExtractor::with_scratch_dir(scratch_dir),
            ocr,
        }
    }

    pub fn extract(&self, pdf_path: impl AsRef<Path>) -> String {
        self.extract_detailed(pdf_path).text
    }

    pub fn extract_detailed(&self, pdf_path: impl AsRef<Path>) -> ExtractionOutcome {
        let pdf_path = pdf_path.as_ref();
        tracing::info!("Reading PDF: {}", pdf_path.display());

        let layer = read_text_layer(pdf_path);
        let mut outcome = ExtractionOutcome {
            text: layer.text,
            ..Default::default()
        };

        if let Some(failure) = layer.failure {
            tracing::error!("Error reading PDF {}: {}", pdf_path.display(), failure);
            outcome
                .diagnostics
                .push(Diagnostic::pdf_parse_failure(failure.to_string()));
            return outcome;
        }

        if !outcome.text.is_empty() {
            return outcome;
        }

        tracing::info!("No text layer found in {}. Using OCR for scanned images.", pdf_path.display());
        outcome.used_ocr_fallback = true;

        let mut images = self.images.extract_images(pdf_path);
        for image in images.by_ref() {
            let page_outcome = self.ocr.extract_detailed(image.path());
            outcome.text.push_str(&page_outcome.text);
            outcome.diagnostics.extend(page_outcome.diagnostics);

            if let Err(e) = image.release() {
                tracing::warn!("Failed to remove extracted image: {}", e);
            }
        }
        outcome.diagnostics.extend(images.into_diagnostics());

        outcome
    }
}
