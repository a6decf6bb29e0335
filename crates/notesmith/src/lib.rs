//! Notesmith - turn lecture PDFs and scanned pages into text and study notes.
//!
//! The heart of the crate is the [`DocumentExtractionPipeline`]: give it a file
//! and a declared kind (PDF or raster image) and it returns plain text.
//!
//! - PDFs are read through their text layer. Only when the *entire* document has
//!   no text layer are its embedded images OCR'd instead.
//! - PNG, JPEG and BMP images are OCR'd directly.
//! - Unreadable inputs degrade to empty or partial text; the only error a caller
//!   sees from extraction is [`NotesmithError::UnsupportedFormat`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use notesmith::{DocumentExtractionPipeline, NotesmithConfig};
//!
//! # fn main() -> notesmith::Result<()> {
//! let pipeline = DocumentExtractionPipeline::from_config(&NotesmithConfig::default())?;
//! let text = pipeline.run("scan.png", "scan.png")?;
//! println!("Extracted: {}", text);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `ocr` - native Tesseract backend
//! - `notes` - Gemini notes client
//! - `api` (default) - Axum HTTP server, implies `notes`

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extractors;
pub mod notes;
pub mod ocr;
pub mod pdf;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

pub use error::{NotesmithError, Result};
pub use types::{Diagnostic, DiagnosticKind, ExtractionOutcome};

pub use self::core::config::{ExtractionConfig, NotesConfig, NotesmithConfig, OcrConfig, ServerConfig};
pub use self::core::kind::{DocumentKind, ImageKind};
pub use self::core::pipeline::DocumentExtractionPipeline;
pub use self::core::scratch::ScratchArena;

pub use extractors::{ImageTextExtractor, PdfTextExtractor};
pub use notes::{NotesService, build_notes_prompt};
pub use ocr::{OcrBackend, default_ocr_backend};
pub use pdf::{ExtractedImage, PdfImageExtractor};

#[cfg(feature = "notes")]
pub use notes::GeminiNotesClient;
