//! Pipeline capability contract.
//!
//! The job manager depends only on this contract, never on how extraction or
//! generation are implemented.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::PipelineError;

/// Receives incremental 0-100 progress updates from a running pipeline.
///
/// The caller owns clamping and monotonic coercion; implementations of
/// [`Pipeline`] only need to report values monotonically within one
/// invocation.
pub trait ProgressSink: Send + Sync {
    fn report(&self, pct: u8);
}

/// Cooperative cancellation flag polled by pipelines at safe points between
/// incremental steps.
///
/// Nothing in the job manager triggers it yet; it is structurally supported
/// for a future cancel-by-id API.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The composed image-to-summary capability.
///
/// Implementations must be blocking (callable synchronously from the worker
/// thread) and must return either a summary or an error; there is no
/// ambiguous in-between outcome.
pub trait Pipeline: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &str;

    /// Transform an image into summary text, reporting progress as work
    /// advances and observing `cancel` between steps.
    fn run(
        &self,
        image_path: &Path,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<String, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_starts_clear() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_token_shared_across_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
