//! Job data types and the status snapshot returned to pollers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Lifecycle state of a job.
///
/// Transitions are one-directional: Queued -> Running -> {Done | Failed}.
/// `Failed` serializes as `"error"`, the wire name status pollers expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Done,
    #[serde(rename = "error")]
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Queued => "queued",
            JobState::Running => "running",
            JobState::Done => "done",
            JobState::Failed => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

/// One submitted image's unit of work, owned by the registry for the life of
/// the process. Only the worker thread mutates a record after creation.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub image_path: PathBuf,
    pub state: JobState,
    /// 0-100, non-decreasing while Running, forced to 100 at terminal states.
    pub progress: u8,
    /// Populated iff state is Done.
    pub result: String,
    /// Populated iff state is Failed.
    pub error: String,
    /// Diagnostics only.
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: String, image_path: PathBuf) -> Self {
        Self {
            id,
            image_path,
            state: JobState::Queued,
            progress: 0,
            result: String::new(),
            error: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Immutable point-in-time copy of a job's pollable fields.
///
/// Serializes to the status wire format:
/// `{"ok":true,"id":…,"state":…,"progress":…,"result":…}` with `"error"`
/// replacing `"result"` for failed jobs, `"result":""` for non-terminal
/// states, and `{"ok":false,"error":"not found"}` for unknown ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSnapshot {
    /// Snapshot for an id the registry has never seen.
    pub fn not_found() -> Self {
        Self {
            ok: false,
            id: None,
            state: None,
            progress: None,
            result: None,
            error: Some("not found".to_string()),
        }
    }

    pub fn to_json(&self) -> String {
        // Serialization of a flat struct of scalars cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| "{\"ok\":false}".to_string())
    }
}

impl From<&Job> for JobSnapshot {
    fn from(job: &Job) -> Self {
        let (result, error) = match job.state {
            JobState::Done => (Some(job.result.clone()), None),
            JobState::Failed => (None, Some(job.error.clone())),
            _ => (Some(String::new()), None),
        };

        Self {
            ok: true,
            id: Some(job.id.clone()),
            state: Some(job.state),
            progress: Some(job.progress),
            result,
            error,
        }
    }
}
