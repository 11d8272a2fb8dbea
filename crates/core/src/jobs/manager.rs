//! Job manager: thread-safe registry, FIFO dispatch queue, and the single
//! worker thread that drives jobs through the pipeline.
//!
//! Single worker is deliberate: the generative stage is memory- and
//! compute-heavy, so concurrency is bounded to one pipeline invocation at a
//! time. Widening this requires an explicit resource budget.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::metrics;
use crate::pipeline::{CancelToken, Pipeline, ProgressSink};

use super::types::{Job, JobSnapshot, JobState};

/// Progress floor set when a job leaves the queue, so pollers see movement
/// before the pipeline's first report.
const INITIAL_RUNNING_PROGRESS: u8 = 5;

struct Registry {
    jobs: HashMap<String, Job>,
    queue: VecDeque<String>,
}

struct Inner {
    registry: Mutex<Registry>,
    wakeup: Condvar,
    stop: AtomicBool,
    pipeline: Arc<dyn Pipeline>,
}

impl Inner {
    /// A poisoned lock only means some thread panicked inside one of our
    /// short critical sections; the registry data is still coherent.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owns the job registry, the dispatch queue, and the worker thread.
///
/// `submit` and `status` are safe to call from any number of threads; each
/// holds the registry lock only for a bounded, constant-time critical
/// section. The pipeline runs with no lock held, so a minutes-long job never
/// blocks submission or polling.
///
/// Known limitations, by design: jobs are never evicted (unbounded registry
/// growth over a long process lifetime), there are no retries, and no
/// timeout is enforced on pipeline execution, so a stuck pipeline stalls the
/// whole queue.
pub struct JobManager {
    inner: Arc<Inner>,
    seq: AtomicU64,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl JobManager {
    /// Creates the manager and starts its worker thread.
    pub fn new(pipeline: Arc<dyn Pipeline>) -> Self {
        let inner = Arc::new(Inner {
            registry: Mutex::new(Registry {
                jobs: HashMap::new(),
                queue: VecDeque::new(),
            }),
            wakeup: Condvar::new(),
            stop: AtomicBool::new(false),
            pipeline,
        });

        let worker_inner = Arc::clone(&inner);
        let handle = std::thread::Builder::new()
            .name("snapsum-job-worker".to_string())
            .spawn(move || worker_loop(&worker_inner))
            .expect("failed to spawn job worker thread");

        Self {
            inner,
            seq: AtomicU64::new(0),
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Queues an image for processing and returns the new job's id.
    ///
    /// Returns immediately; the image path is not validated here and
    /// execution starts only when the worker reaches the job.
    pub fn submit(&self, image_path: impl Into<PathBuf>) -> String {
        let image_path = image_path.into();
        let id = self.new_id();
        let job = Job::new(id.clone(), image_path);

        {
            let mut registry = self.inner.lock();
            registry.jobs.insert(id.clone(), job);
            registry.queue.push_back(id.clone());
        }
        self.inner.wakeup.notify_one();

        metrics::JOBS_SUBMITTED.inc();
        debug!("Submitted job {}", id);
        id
    }

    /// Returns a point-in-time copy of the job's pollable fields, or a
    /// not-found snapshot for ids the registry has never seen. Never blocks
    /// beyond copying the record and never fails.
    pub fn status(&self, id: &str) -> JobSnapshot {
        let registry = self.inner.lock();
        registry
            .jobs
            .get(id)
            .map(JobSnapshot::from)
            .unwrap_or_else(JobSnapshot::not_found)
    }

    /// Status snapshot in its serialized wire form.
    pub fn get_status_json(&self, id: &str) -> String {
        self.status(id).to_json()
    }

    /// Signals the worker to stop and blocks until it has exited.
    ///
    /// An in-flight job runs to its terminal state first; still-queued jobs
    /// remain Queued. Idempotent.
    pub fn shutdown(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        self.inner.wakeup.notify_all();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            info!("Waiting for job worker to exit");
            if handle.join().is_err() {
                error!("Job worker thread exited via panic");
            } else {
                info!("Job worker stopped");
            }
        }
    }

    /// Ids combine a process-local monotonic counter with fresh randomness.
    /// Wall-clock time alone would collide under burst submission.
    fn new_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("{:x}-{}", seq, Uuid::new_v4().simple())
    }
}

impl Drop for JobManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Writes pipeline progress into the job record, clamped to [0, 100] and
/// coerced non-decreasing. Updates after the job left Running are dropped.
struct RegistrySink<'a> {
    inner: &'a Inner,
    id: String,
}

impl ProgressSink for RegistrySink<'_> {
    fn report(&self, pct: u8) {
        let mut registry = self.inner.lock();
        if let Some(job) = registry.jobs.get_mut(&self.id) {
            if job.state == JobState::Running {
                job.progress = job.progress.max(pct.min(100));
            }
        }
    }
}

fn worker_loop(inner: &Inner) {
    info!("Job worker started");
    loop {
        // Pop under the lock and mark the job Running; the pipeline call
        // below runs with no lock held.
        let (id, image_path) = {
            let mut registry = inner.lock();
            loop {
                if inner.stop.load(Ordering::SeqCst) {
                    info!("Job worker received stop signal");
                    return;
                }
                if let Some(id) = registry.queue.pop_front() {
                    if let Some(job) = registry.jobs.get_mut(&id) {
                        job.state = JobState::Running;
                        job.progress = INITIAL_RUNNING_PROGRESS;
                        break (id, job.image_path.clone());
                    }
                    continue;
                }
                registry = match inner.wakeup.wait(registry) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
            }
        };

        debug!("Job {} running pipeline {}", id, inner.pipeline.name());
        let started = Instant::now();
        let sink = RegistrySink {
            inner,
            id: id.clone(),
        };
        let cancel = CancelToken::new();

        // A pipeline fault must never leave a job stuck in Running, so even
        // panics are converted to a Failed terminal state here.
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            inner.pipeline.run(&image_path, &sink, &cancel)
        }));
        let result = match outcome {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => Err(format!("pipeline panicked: {}", panic_message(&panic))),
        };

        let mut registry = inner.lock();
        if let Some(job) = registry.jobs.get_mut(&id) {
            job.progress = 100;
            match result {
                Ok(text) => {
                    job.state = JobState::Done;
                    job.result = text;
                    info!("Job {} done in {:.1}s", id, started.elapsed().as_secs_f64());
                    metrics::JOBS_FINISHED.with_label_values(&["done"]).inc();
                }
                Err(message) => {
                    job.state = JobState::Failed;
                    warn!("Job {} failed: {}", id, message);
                    job.error = message;
                    metrics::JOBS_FINISHED.with_label_values(&["error"]).inc();
                }
            }
            metrics::JOB_DURATION.observe(started.elapsed().as_secs_f64());
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
