mod manager;
mod types;

pub use manager::JobManager;
pub use types::{Job, JobSnapshot, JobState};
