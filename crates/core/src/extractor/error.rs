use std::path::PathBuf;
use thiserror::Error;

/// Error type for text extraction.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The input image does not exist.
    #[error("Input image not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The OCR binary could not be located.
    #[error("OCR binary not found at: {path}")]
    BinaryNotFound { path: String },

    /// The OCR process ran but failed.
    #[error("Extraction failed: {reason}")]
    ExtractionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// IO error while spawning or reading the OCR process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    pub fn extraction_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ExtractionFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
