//! Image-to-summary pipeline: the capability contract the job manager runs,
//! plus the OCR-then-LLM composition of it.

mod error;
mod ocr_llm;
mod prompt;
mod traits;

pub use error::PipelineError;
pub use ocr_llm::OcrLlmPipeline;
pub use prompt::build_prompt;
pub use traits::{CancelToken, Pipeline, ProgressSink};
