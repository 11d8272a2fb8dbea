//! Text summarization (generation) capability.

mod error;
mod llama_cli;
mod traits;

pub use error::SummarizerError;
pub use llama_cli::LlamaCliSummarizer;
pub use traits::Summarizer;
