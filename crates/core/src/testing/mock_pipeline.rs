use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};

use crate::extractor::ExtractorError;
use crate::pipeline::{CancelToken, Pipeline, PipelineError, ProgressSink};

/// Permit counter the mock blocks on, so tests can hold a pipeline run open
/// and observe intermediate job states.
#[derive(Clone, Default)]
pub struct Gate {
    state: Arc<(Mutex<usize>, Condvar)>,
}

impl Gate {
    /// Makes `permits` further runs proceed.
    pub fn release(&self, permits: usize) {
        let (count, wakeup) = &*self.state;
        *count.lock().unwrap() += permits;
        wakeup.notify_all();
    }

    fn acquire(&self) {
        let (count, wakeup) = &*self.state;
        let mut permits = count.lock().unwrap();
        while *permits == 0 {
            permits = wakeup.wait(permits).unwrap();
        }
        *permits -= 1;
    }
}

/// Scriptable [`Pipeline`] double. Runs succeed with a canned summary unless
/// outcomes are queued, and record every path they were invoked with.
#[derive(Default)]
pub struct MockPipeline {
    outcomes: Mutex<VecDeque<Result<String, String>>>,
    progress_script: Mutex<Vec<u8>>,
    panic_next: AtomicBool,
    calls: Mutex<Vec<PathBuf>>,
    gate: Mutex<Option<Gate>>,
}

impl MockPipeline {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a successful run producing `summary`.
    pub fn push_ok(&self, summary: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(summary.to_string()));
    }

    /// Queues a failing run whose error message contains `message`.
    pub fn push_err(&self, message: &str) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }

    /// Makes every run report these percentages, in order, before blocking
    /// on the gate (if any).
    pub fn set_progress_script(&self, script: Vec<u8>) {
        *self.progress_script.lock().unwrap() = script;
    }

    /// Makes the next run panic instead of returning.
    pub fn panic_on_next_run(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }

    /// Installs a gate each run must acquire a permit from, and returns it.
    pub fn gated(&self) -> Gate {
        let gate = Gate::default();
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Paths of all runs so far, in invocation order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl Pipeline for MockPipeline {
    fn name(&self) -> &str {
        "mock"
    }

    fn run(
        &self,
        image_path: &Path,
        progress: &dyn ProgressSink,
        _cancel: &CancelToken,
    ) -> Result<String, PipelineError> {
        self.calls.lock().unwrap().push(image_path.to_path_buf());

        for pct in self.progress_script.lock().unwrap().iter() {
            progress.report(*pct);
        }

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire();
        }

        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("mock pipeline panic");
        }

        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(summary)) => Ok(summary),
            Some(Err(message)) => Err(PipelineError::Extraction(
                ExtractorError::extraction_failed(message, None),
            )),
            None => Ok("mock summary".to_string()),
        }
    }
}
