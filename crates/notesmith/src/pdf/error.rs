use std::fmt;

#[derive(Debug, Clone)]
pub enum PdfError {
    InvalidPdf(String),
    TextExtractionFailed { page: u32, message: String },
    ContentStreamFailed { page: u32, message: String },
    MalformedPage { page: u32, message: String },
    UnsupportedImage(String),
    IOError(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::InvalidPdf(msg) => write!(f, "Invalid PDF: {}", msg),
            PdfError::TextExtractionFailed { page, message } => {
                write!(f, "Text extraction failed on page {}: {}", page, message)
            }
            PdfError::ContentStreamFailed { page, message } => {
                write!(f, "Could not read content stream of page {}: {}", page, message)
            }
            PdfError::MalformedPage { page, message } => write!(f, "Malformed page {}: {}", page, message),
            PdfError::UnsupportedImage(msg) => write!(f, "Unsupported image: {}", msg),
            PdfError::IOError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

// NOTE: No From<std::io::Error> impl - IO errors must bubble up unchanged per error handling policy

impl From<lopdf::Error> for PdfError {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(io_err) => PdfError::IOError(io_err.to_string()),
            _ => PdfError::InvalidPdf(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_error() {
        let err = PdfError::InvalidPdf("corrupted header".to_string());
        assert_eq!(err.to_string(), "Invalid PDF: corrupted header");
    }

    #[test]
    fn test_text_extraction_failed_error() {
        let err = PdfError::TextExtractionFailed {
            page: 3,
            message: "missing font".to_string(),
        };
        assert_eq!(err.to_string(), "Text extraction failed on page 3: missing font");
    }

    #[test]
    fn test_content_stream_failed_error() {
        let err = PdfError::ContentStreamFailed {
            page: 1,
            message: "bad operator".to_string(),
        };
        assert_eq!(err.to_string(), "Could not read content stream of page 1: bad operator");
    }

    #[test]
    fn test_unsupported_image_error() {
        let err = PdfError::UnsupportedImage("Indexed color space".to_string());
        assert_eq!(err.to_string(), "Unsupported image: Indexed color space");
    }

    #[test]
    fn test_from_lopdf_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.pdf");
        let err: PdfError = lopdf::Error::IO(io_err).into();
        assert!(matches!(err, PdfError::IOError(_)));
    }
}
