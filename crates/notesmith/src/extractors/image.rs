//! OCR text extraction for standalone raster images.

use std::path::Path;
use std::sync::Arc;

use crate::ocr::{OcrBackend, strip_control_characters};
use crate::types::{Diagnostic, ExtractionOutcome, preview};
use crate::{NotesmithError, Result};

/// Recognizes text in PNG, JPEG, BMP (and other formats the `image` crate decodes).
///
/// Never fails: unreadable or undecodable files and OCR engine errors yield an
/// empty string, with the cause logged and kept as a diagnostic.
#[derive(Clone)]
pub struct ImageTextExtractor {
    backend: Arc<dyn OcrBackend>,
}

impl std::fmt::Debug for ImageTextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageTextExtractor")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl ImageTextExtractor {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn OcrBackend> {
        &self.backend
    }

    /// Recognized text of the image at `image_path`, or `""` on any failure.
    pub fn extract(&self, image_path: impl AsRef<Path>) -> String {
        self.extract_detailed(image_path).text
    }

    /// Like [`extract`](Self::extract), also reporting why the text is empty.
    pub fn extract_detailed(&self, image_path: impl AsRef<Path>) -> ExtractionOutcome {
        let image_path = image_path.as_ref();
        tracing::info!("Reading image: {}", image_path.display());

        match self.recognize_file(image_path) {
            Ok(text) => {
                tracing::info!("Extracted text from image: {}...", preview(&text, 50));
                ExtractionOutcome {
                    text,
                    ..Default::default()
                }
            }
            Err(e) => {
                tracing::warn!("Error reading image {}: {}", image_path.display(), e);
                ExtractionOutcome {
                    diagnostics: vec![Diagnostic::decode_failure(format!("{}: {}", image_path.display(), e))],
                    ..Default::default()
                }
            }
        }
    }

    fn recognize_file(&self, image_path: &Path) -> Result<String> {
        let bytes = std::fs::read(image_path)?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| NotesmithError::ocr_with_source(format!("Failed to decode image: {}", e), e))?;

        tracing::debug!(
            "Decoded {}x{} image, running {} OCR",
            image.width(),
            image.height(),
            self.backend.name()
        );

        let text = self.backend.recognize(&image)?;
        Ok(strip_control_characters(&text))
    }
}
