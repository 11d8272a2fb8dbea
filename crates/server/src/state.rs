use std::path::Path;
use std::sync::Arc;
use snapsum_core::{Config, JobManager, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    jobs: Arc<JobManager>,
}

impl AppState {
    pub fn new(config: Config, jobs: Arc<JobManager>) -> Self {
        Self { config, jobs }
    }

    pub fn jobs(&self) -> &JobManager {
        &self.jobs
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload.dir
    }

    pub fn web_root(&self) -> &Path {
        &self.config.server.web_root
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }
}
