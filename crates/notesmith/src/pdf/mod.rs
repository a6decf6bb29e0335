//! PDF document processing.
//!
//! Low-level helpers built on `lopdf`:
//!
//! - **Text layer**: read the embedded text of each page ([`text`])
//! - **Image extraction**: pull embedded raster images out of page content streams ([`images`])
//! - **Error handling**: PDF-specific error types ([`error`])
//!
//! The text-first, OCR-fallback policy lives in
//! [`PdfTextExtractor`](crate::extractors::PdfTextExtractor).
pub mod error;
pub mod images;
mod page;
pub mod text;

pub use error::PdfError;
pub use images::{ExtractedImage, PdfImageExtractor, PdfImages};
pub use text::{TextLayer, read_text_layer};
