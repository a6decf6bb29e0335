//! Error types for Notesmith.
//!
//! Every fallible operation in the library returns [`NotesmithError`]. Only a
//! few variants are expected to reach callers of the extraction pipeline:
//!
//! - `UnsupportedFormat` - the declared document kind is not one we handle
//! - `Service` - the notes generation service failed
//!
//! Everything else (unreadable images, corrupt PDFs, OCR engine failures) is
//! absorbed by the extractors and degrades to empty or partial text. Those
//! variants still exist so that the lower-level helpers can report *what*
//! went wrong before the extractor decides to swallow it.
//!
//! # Example
//!
//! ```rust
//! use notesmith::{NotesmithError, Result};
//!
//! fn require_text(text: &str) -> Result<&str> {
//!     if text.is_empty() {
//!         return Err(NotesmithError::validation("document produced no text"));
//!     }
//!     Ok(text)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `NotesmithError`.
pub type Result<T> = std::result::Result<T, NotesmithError>;

/// Main error type for all Notesmith operations.
#[derive(Debug, Error)]
pub enum NotesmithError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Notes service error: {message}")]
    Service {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for NotesmithError {
    fn from(err: serde_json::Error) -> Self {
        NotesmithError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::pdf::PdfError> for NotesmithError {
    fn from(err: crate::pdf::PdfError) -> Self {
        NotesmithError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<crate::ocr::OcrError> for NotesmithError {
    fn from(err: crate::ocr::OcrError) -> Self {
        NotesmithError::Ocr {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $with_source:ident, $variant:ident) => {
        #[doc = concat!("Create a `", stringify!($variant), "` error")]
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        #[doc = concat!("Create a `", stringify!($variant), "` error with source")]
        pub fn $with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl NotesmithError {
    error_constructor!(parsing, parsing_with_source, Parsing);
    error_constructor!(ocr, ocr_with_source, Ocr);
    error_constructor!(validation, validation_with_source, Validation);
    error_constructor!(service, service_with_source, Service);
}
