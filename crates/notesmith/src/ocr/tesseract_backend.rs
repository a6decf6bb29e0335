//! Native Tesseract OCR backend.

use std::env;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use super::backend::OcrBackend;
use super::error::OcrError;
use crate::Result;
use crate::core::config::OcrConfig;

const FALLBACK_TESSDATA_PATHS: &[&str] = &[
    "/opt/homebrew/share/tessdata",
    "/opt/homebrew/opt/tesseract/share/tessdata",
    "/usr/local/opt/tesseract/share/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r#"C:\Program Files\Tesseract-OCR\tessdata"#,
    r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
];

/// Tesseract backend configured once from [`OcrConfig`].
///
/// A fresh `TesseractAPI` handle is created for every image, so the backend
/// holds no engine state and can be shared across threads.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    language: String,
    psm: u8,
    tessdata_path: String,
}

impl TesseractBackend {
    /// Validate `config` against the local tessdata installation.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let tessdata_path = resolve_tessdata_path(config.tessdata_path.as_deref());
        validate_languages(&config.language, &tessdata_path)?;

        if config.psm > 13 {
            return Err(OcrError::InvalidConfiguration(format!("PSM mode must be 0-13, got {}", config.psm)).into());
        }

        tracing::debug!(
            "Tesseract {} with tessdata at '{}'",
            TesseractAPI::version(),
            if tessdata_path.is_empty() { "<engine default>" } else { &tessdata_path }
        );

        Ok(Self {
            language: config.language.clone(),
            psm: config.psm,
            tessdata_path,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn run(&self, image: &DynamicImage) -> std::result::Result<String, OcrError> {
        let rgb_image = image.to_rgb8();
        let (width, height) = rgb_image.dimensions();
        let (width, height, bytes_per_line) = rgb_layout(width, height)?;

        let api = TesseractAPI::new();

        api.init(&self.tessdata_path, &self.language).map_err(|e| {
            OcrError::TesseractInitializationFailed(format!("Failed to initialize language '{}': {}", self.language, e))
        })?;

        api.set_page_seg_mode(TessPageSegMode::from_int(self.psm as i32))
            .map_err(|e| OcrError::InvalidConfiguration(format!("Failed to set PSM mode: {}", e)))?;

        api.set_image(rgb_image.as_raw(), width, height, RGB_BYTES_PER_PIXEL, bytes_per_line)
        .map_err(|e| OcrError::ProcessingFailed(format!("Failed to set image: {}", e)))?;

        api.recognize()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to recognize text: {}", e)))?;

        api.get_utf8_text()
            .map_err(|e| OcrError::ProcessingFailed(format!("Failed to extract text: {}", e)))
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        Ok(self.run(image)?)
    }
}

/// Pick the tessdata directory: explicit path, then `TESSDATA_PREFIX`, then well-known locations.
///
/// Returns an empty string when nothing is found, which lets Tesseract use its compiled-in default.
fn resolve_tessdata_path(configured: Option<&Path>) -> String {
    if let Some(path) = configured {
        return path.to_string_lossy().into_owned();
    }

    env::var("TESSDATA_PREFIX")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .or_else(|| {
            FALLBACK_TESSDATA_PATHS
                .iter()
                .find(|p| Path::new(p).exists())
                .map(|p| (*p).to_string())
        })
        .unwrap_or_default()
}

const RGB_BYTES_PER_PIXEL: i32 = 3;

/// Width, height and row stride of a packed RGB image, as Tesseract takes them.
fn rgb_layout(width: u32, height: u32) -> std::result::Result<(i32, i32, i32), OcrError> {
    if width == 0 || height == 0 {
        return Err(OcrError::ImageProcessingFailed(format!("empty image ({}x{})", width, height)));
    }
    let too_large = || OcrError::ImageProcessingFailed(format!("image too large for Tesseract ({}x{})", width, height));
    let w = i32::try_from(width).map_err(|_| too_large())?;
    let h = i32::try_from(height).map_err(|_| too_large())?;
    let stride = w.checked_mul(RGB_BYTES_PER_PIXEL).ok_or_else(too_large)?;
    Ok((w, h, stride))
}

// Tesseract can crash on an empty language or a missing traineddata file
// instead of returning an error, so both are checked up front.
fn validate_languages(language: &str, tessdata_path: &str) -> std::result::Result<(), OcrError> {
    if language.trim().is_empty() {
        return Err(OcrError::TesseractInitializationFailed(
            "Language cannot be empty. Please specify a valid language code (e.g., 'eng')".to_string(),
        ));
    }

    if tessdata_path.is_empty() {
        return Ok(());
    }

    for lang in language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
        let traineddata_path: PathBuf = Path::new(tessdata_path).join(format!("{}.traineddata", lang));
        if !traineddata_path.exists() {
            return Err(OcrError::TesseractInitializationFailed(format!(
                "Language '{}' not found. Traineddata file does not exist: {}",
                lang,
                traineddata_path.display()
            )));
        }
    }

    Ok(())
}
