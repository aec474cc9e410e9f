//! Extraction error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during content extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Plain-text payload is not valid UTF-8.
    #[error("Payload is not valid UTF-8: {0}")]
    Decoding(#[from] std::string::FromUtf8Error),

    /// PDF could not be opened.
    #[error("PDF extraction error: {0}")]
    Pdf(String),

    /// DOCX could not be parsed.
    #[error("DOCX extraction error: {0}")]
    Docx(String),

    /// OCR engine binary is missing at the configured path.
    #[error("OCR engine not found at {}", path.display())]
    EngineNotFound { path: PathBuf },

    /// Image payload could not be decoded into a raster.
    #[error("Image decoding error: {0}")]
    Image(String),

    /// OCR engine ran but failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// CSV payload could not be parsed.
    #[error("CSV extraction error: {0}")]
    Csv(String),

    /// IO error during extraction.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractError {
    /// Whether this failure must stop the current interaction outright.
    ///
    /// A missing OCR engine is a deployment problem, not a bad upload.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EngineNotFound { .. })
    }
}

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_not_found_is_fatal() {
        let err = ExtractError::EngineNotFound {
            path: PathBuf::from("/opt/missing/tesseract"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/opt/missing/tesseract"));
    }

    #[test]
    fn test_other_errors_not_fatal() {
        assert!(!ExtractError::Pdf("broken xref".to_string()).is_fatal());
        assert!(!ExtractError::Csv("bad row".to_string()).is_fatal());
    }
}
