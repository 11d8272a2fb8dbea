pub mod config;
pub mod extractor;
pub mod jobs;
pub mod metrics;
pub mod pipeline;
pub mod summarizer;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GenParams,
    SanitizedConfig,
};
pub use extractor::{ExtractorError, TesseractExtractor, TextExtractor};
pub use jobs::{Job, JobManager, JobSnapshot, JobState};
pub use pipeline::{CancelToken, OcrLlmPipeline, Pipeline, PipelineError, ProgressSink};
pub use summarizer::{LlamaCliSummarizer, Summarizer, SummarizerError};
