//! Document extraction pipeline.
//!
//! Resolves the declared document kind and hands the file to the matching
//! extractor. This is the single entry point used by the HTTP API and the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::NotesmithConfig;
use super::kind::DocumentKind;
use crate::Result;
use crate::extractors::{ImageTextExtractor, PdfTextExtractor};
use crate::ocr::{OcrBackend, default_ocr_backend};
use crate::types::ExtractionOutcome;

/// Dispatches documents to the PDF or image extractor.
///
/// The pipeline holds no per-request state, so one instance can be shared
/// (e.g. behind an `Arc`) by any number of concurrent callers. Each call is
/// synchronous and blocks until the text is ready.
///
/// The input document is never modified or deleted.
///
/// # Example
///
/// ```rust,no_run
/// use notesmith::{DocumentExtractionPipeline, NotesmithConfig};
///
/// # fn main() -> notesmith::Result<()> {
/// let pipeline = DocumentExtractionPipeline::from_config(&NotesmithConfig::default())?;
/// let text = pipeline.run("lecture.pdf", "lecture.pdf")?;
/// println!("{}", text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentExtractionPipeline {
    pdf: PdfTextExtractor,
    image: ImageTextExtractor,
}

impl DocumentExtractionPipeline {
    /// Pipeline using `backend` for all OCR and the system temp dir for scratch files.
    pub fn new(backend: Arc<dyn OcrBackend>) -> Self {
        Self::with_scratch_dir(backend, None)
    }

    pub fn with_scratch_dir(backend: Arc<dyn OcrBackend>, scratch_dir: Option<PathBuf>) -> Self {
        let image = ImageTextExtractor::new(backend);
        Self {
            pdf: PdfTextExtractor::with_scratch_dir(image.clone(), scratch_dir),
            image,
        }
    }

    /// Build the OCR backend and scratch settings from configuration.
    ///
    /// Fails when the configured OCR languages are not installed.
    pub fn from_config(config: &NotesmithConfig) -> Result<Self> {
        let backend = default_ocr_backend(&config.ocr)?;
        Ok(Self::with_scratch_dir(backend, config.extraction.scratch_dir.clone()))
    }

    /// Extract the text of `document_path`.
    ///
    /// `kind_hint` is a file name or dotted extension (`"notes.PDF"`, `".png"`).
    /// It is resolved before the file is touched; a hint without a dot is rejected.
    ///
    /// # Errors
    ///
    /// Only [`NotesmithError::UnsupportedFormat`](crate::NotesmithError::UnsupportedFormat).
    /// Unreadable or corrupt documents produce empty or partial text instead.
    pub fn run(&self, document_path: impl AsRef<Path>, kind_hint: &str) -> Result<String> {
        let kind = DocumentKind::from_hint(kind_hint)?;
        Ok(self.run_kind(document_path, kind))
    }

    /// Like [`run`](Self::run), returning diagnostics alongside the text.
    pub fn run_detailed(&self, document_path: impl AsRef<Path>, kind_hint: &str) -> Result<ExtractionOutcome> {
        let kind = DocumentKind::from_hint(kind_hint)?;
        Ok(self.run_kind_detailed(document_path, kind))
    }

    /// Extract with an already resolved kind.
    pub fn run_kind(&self, document_path: impl AsRef<Path>, kind: DocumentKind) -> String {
        self.run_kind_detailed(document_path, kind).text
    }

    pub fn run_kind_detailed(&self, document_path: impl AsRef<Path>, kind: DocumentKind) -> ExtractionOutcome {
        let document_path = document_path.as_ref();
        tracing::debug!("Dispatching {} as {}", document_path.display(), kind);

        let outcome = match kind {
            DocumentKind::Pdf => self.pdf.extract_detailed(document_path),
            DocumentKind::Image(_) => self.image.extract_detailed(document_path),
        };

        if outcome.text.is_empty() {
            tracing::warn!(
                "No text recovered from {} ({} diagnostic(s))",
                document_path.display(),
                outcome.diagnostics.len()
            );
        }
        outcome
    }
}
