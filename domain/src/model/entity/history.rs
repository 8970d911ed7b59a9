use chrono::{DateTime, Utc};
use serde::Serialize;

use super::JobStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatusHistory {
    pub status: JobStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub run_time_seconds: f64,
    pub restarts: u32,
    /// In the order the service reported them, never re-sorted.
    pub transitions: Vec<JobStatusItem>,
}

/// One status change of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusItem {
    pub status: JobStatus,
    pub reason: Option<String>,
    pub transition_time: DateTime<Utc>,
}

impl JobStatusHistory {
    /// History of a job whose response carried no `history` object.
    pub fn empty(status: JobStatus, transitions: Vec<JobStatusItem>) -> Self {
        Self {
            status,
            created_at: None,
            started_at: None,
            finished_at: None,
            run_time_seconds: 0.0,
            restarts: 0,
            transitions,
        }
    }
}
