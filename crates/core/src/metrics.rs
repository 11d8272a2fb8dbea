//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Job lifecycle (submissions, terminal states, durations)
//! - Pipeline stages (OCR extraction, summary generation)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Job Lifecycle Metrics
// =============================================================================

/// Jobs submitted total.
pub static JOBS_SUBMITTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("snapsum_jobs_submitted_total", "Total jobs submitted").unwrap()
});

/// Jobs reaching a terminal state, by outcome.
pub static JOBS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "snapsum_jobs_finished_total",
            "Total jobs reaching a terminal state",
        ),
        &["result"], // "done", "error"
    )
    .unwrap()
});

/// End-to-end job duration in seconds, from dequeue to terminal state.
pub static JOB_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("snapsum_job_duration_seconds", "Duration of job execution")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

// =============================================================================
// Pipeline Stage Metrics
// =============================================================================

/// Pipeline stage duration in seconds.
pub static STAGE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "snapsum_stage_duration_seconds",
            "Duration of individual pipeline stages",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["stage"], // "ocr", "generate"
    )
    .unwrap()
});

/// Characters extracted by OCR per image.
pub static OCR_TEXT_LENGTH: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "snapsum_ocr_text_length_chars",
            "Characters of text extracted per image",
        )
        .buckets(vec![0.0, 50.0, 200.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]),
    )
    .unwrap()
});

/// All metrics for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(JOBS_SUBMITTED.clone()),
        Box::new(JOBS_FINISHED.clone()),
        Box::new(JOB_DURATION.clone()),
        Box::new(STAGE_DURATION.clone()),
        Box::new(OCR_TEXT_LENGTH.clone()),
    ]
}
