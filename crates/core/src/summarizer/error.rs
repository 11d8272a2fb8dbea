use std::path::PathBuf;
use thiserror::Error;

/// Error type for summarization.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// The LLM binary could not be located.
    #[error("LLM binary not found at: {path}")]
    BinaryNotFound { path: String },

    /// The model file does not exist.
    #[error("Model not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// The LLM process ran but failed.
    #[error("Generation failed: {reason}")]
    GenerationFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// IO error while spawning or reading the LLM process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SummarizerError {
    pub fn generation_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::GenerationFailed {
            reason: reason.into(),
            stderr,
        }
    }
}
