//! OCR (Optical Character Recognition) subsystem.
//!
//! Recognition sits behind the [`OcrBackend`] trait. The native Tesseract
//! backend is compiled in with the `ocr` feature; without it,
//! [`default_ocr_backend`] hands out an [`UnavailableOcrBackend`] and image
//! extraction degrades to empty text.
//!
//! # Example
//!
//! ```rust,no_run
//! use notesmith::core::config::OcrConfig;
//! use notesmith::ocr::default_ocr_backend;
//!
//! # fn example() -> notesmith::Result<()> {
//! let backend = default_ocr_backend(&OcrConfig::default())?;
//! let image = image::open("scan.png").map_err(|e| notesmith::NotesmithError::ocr(e.to_string()))?;
//! println!("{}", backend.recognize(&image)?);
//! # Ok(())
//! # }
//! ```
pub mod backend;
pub mod error;
#[cfg(feature = "ocr")]
pub mod tesseract_backend;
pub mod utils;

pub use backend::{OcrBackend, UnavailableOcrBackend, default_ocr_backend};
pub use error::OcrError;
#[cfg(feature = "ocr")]
pub use tesseract_backend::TesseractBackend;
pub use utils::strip_control_characters;
