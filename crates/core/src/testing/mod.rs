//! Testing utilities and mock implementations.
//!
//! Mocks for the pipeline seams, allowing job and server tests to run
//! without tesseract or a model on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use snapsum_core::testing::MockPipeline;
//!
//! let pipeline = MockPipeline::new();
//! pipeline.push_ok("a summary");
//! let manager = JobManager::new(pipeline);
//! ```

mod mock_pipeline;

pub use mock_pipeline::{Gate, MockPipeline};
