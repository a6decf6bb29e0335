//! Document-kind specific text extractors.
//!
//! - [`ImageTextExtractor`] - OCR over a standalone raster image
//! - [`PdfTextExtractor`] - PDF text layer, with OCR over embedded images when the layer is empty
//!
//! Both are synchronous and infallible by contract: failures degrade to empty or
//! partial text and are reported through [`ExtractionOutcome`](crate::types::ExtractionOutcome)
//! diagnostics.
pub mod image;
pub mod pdf;

pub use self::image::ImageTextExtractor;
pub use self::pdf::PdfTextExtractor;
