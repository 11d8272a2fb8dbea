use crate::extractor::ExtractorError;
use crate::summarizer::SummarizerError;

/// Error type for pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Text extraction (OCR) failed.
    #[error("Text extraction failed: {0}")]
    Extraction(#[from] ExtractorError),

    /// The image contained no recognizable text.
    #[error("No text recognized in image")]
    EmptyExtraction,

    /// Summarization failed.
    #[error("Summarization failed: {0}")]
    Generation(#[from] SummarizerError),

    /// Execution was cancelled via the cancel token.
    #[error("Pipeline cancelled")]
    Cancelled,
}
