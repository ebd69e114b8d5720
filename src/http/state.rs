//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::DatasetRepository;
use crate::services::job_tracker::JobTracker;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for dataset storage
    pub repository: Arc<dyn DatasetRepository>,
    /// Tracker for background ingest jobs
    pub job_tracker: JobTracker,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: Arc<dyn DatasetRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            job_tracker: JobTracker::new(),
            config: Arc::new(config),
        }
    }
}
