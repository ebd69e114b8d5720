//! Job tracking for async dataset ingestion.
//!
//! In-memory tracker storing progress logs for background ingest jobs so
//! the dashboard can stream them while a batch is processed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DatasetId;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// One ingestion job: which dataset it is building and how far it got.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub job_id: String,
    pub dataset_name: String,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Set on success: the stored (or deduplicated) dataset.
    pub dataset_id: Option<DatasetId>,
}

/// In-memory job tracker.
#[derive(Clone, Default)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new ingestion job and return its ID.
    pub fn create_job(&self, dataset_name: impl Into<String>) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = Job {
            job_id: job_id.clone(),
            dataset_name: dataset_name.into(),
            status: JobStatus::Running,
            logs: Vec::new(),
            created_at: chrono::Utc::now(),
            completed_at: None,
            dataset_id: None,
        };
        self.jobs.write().insert(job_id.clone(), job);
        job_id
    }

    fn update(&self, job_id: &str, apply: impl FnOnce(&mut Job)) {
        if let Some(job) = self.jobs.write().get_mut(job_id) {
            apply(job);
        }
    }

    /// Append a log entry. Unknown job IDs are ignored.
    pub fn log(&self, job_id: &str, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
        };
        self.update(job_id, |job| job.logs.push(entry));
    }

    /// Settle a job as completed, recording the dataset it produced.
    pub fn complete_job(&self, job_id: &str, dataset_id: DatasetId) {
        self.update(job_id, |job| {
            job.status = JobStatus::Completed;
            job.completed_at = Some(chrono::Utc::now());
            job.dataset_id = Some(dataset_id);
        });
    }

    /// Settle a job as failed, appending the error to its log.
    pub fn fail_job(&self, job_id: &str, error_message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: chrono::Utc::now(),
            level: LogLevel::Error,
            message: error_message.into(),
        };
        self.update(job_id, |job| {
            job.status = JobStatus::Failed;
            job.completed_at = Some(chrono::Utc::now());
            job.logs.push(entry);
        });
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Get all logs for a job.
    pub fn get_logs(&self, job_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }
}
