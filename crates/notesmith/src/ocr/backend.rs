//! The OCR engine seam.

use std::sync::Arc;

use image::DynamicImage;

use crate::Result;
use crate::core::config::OcrConfig;

/// A text recognizer for decoded raster images.
///
/// Implementations are configured once and then shared read-only, so a single
/// backend can serve many concurrent extractions.
///
/// # Thread Safety
///
/// Must be `Send + Sync`. Calls are synchronous and may block for seconds on
/// large scans; async callers should run them on a blocking pool.
pub trait OcrBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Recognize text in `image`. Whitespace and line breaks are kept as the engine emits them.
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}

/// Placeholder used when the crate is built without the `ocr` feature.
///
/// Every call fails with [`NotesmithError::MissingDependency`](crate::NotesmithError::MissingDependency),
/// which the extractors turn into empty text.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableOcrBackend;

impl OcrBackend for UnavailableOcrBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        Err(crate::NotesmithError::MissingDependency(
            "OCR support is not compiled in. Rebuild with the 'ocr' feature to enable Tesseract".to_string(),
        ))
    }
}

/// Build the best backend available in this build.
///
/// With the `ocr` feature this is a [`TesseractBackend`](super::TesseractBackend) and
/// fails if the configured languages are not installed. Without it, an
/// [`UnavailableOcrBackend`] is returned and a warning is logged.
pub fn default_ocr_backend(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>> {
    #[cfg(feature = "ocr")]
    {
        let backend = super::TesseractBackend::new(config)?;
        tracing::info!(
            "Using Tesseract OCR backend (language={}, psm={})",
            config.language,
            config.psm
        );
        Ok(Arc::new(backend))
    }

    #[cfg(not(feature = "ocr"))]
    {
        tracing::warn!(
            "Built without the 'ocr' feature; scanned images and image-only PDFs will yield empty text (language={} ignored)",
            config.language
        );
        Ok(Arc::new(UnavailableOcrBackend))
    }
}
