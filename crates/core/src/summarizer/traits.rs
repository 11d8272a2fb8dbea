use super::error::SummarizerError;

/// Turns a prompt into generated summary text.
///
/// Blocking: implementations run on the job manager's worker thread.
/// `on_delta` is invoked for each chunk of streamed output so callers can
/// advance progress while generation is underway; the full assembled text is
/// also returned.
pub trait Summarizer: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`, streaming chunks through
    /// `on_delta` as they are produced.
    fn summarize(
        &self,
        prompt: &str,
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<String, SummarizerError>;
}
