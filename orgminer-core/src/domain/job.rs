//! Job domain types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::domain::result::AnalysisResults;

/// One request to analyze a repository's organizational structure as of a
/// specific end date.
///
/// Structure shared between orchestrator (persists) and worker (updates).
/// The terminal record is written once and never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub author: String,
    pub repository: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: JobStatus,
    pub error: Option<String>,
    pub results: Option<AnalysisResults>,
    pub requested_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Creates a fresh job in the Pending state.
    ///
    /// The analysis window start date is derived from the end date.
    pub fn new(author: String, repository: String, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            repository,
            start_date: dates::start_date_for(end_date),
            end_date,
            status: JobStatus::Pending,
            error: None,
            results: None,
            requested_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, JobStatus::Success | JobStatus::Failed)
    }
}

/// Job execution status
///
/// Lifecycle: Pending -> Started -> (Success | Failed). Timeouts and
/// structurally incomplete results both land on Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Pending,
    Started,
    Success,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_derives_start_date() {
        let end = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let job = Job::new("bundler".to_string(), "bundler".to_string(), end);

        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.start_date, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        assert!(job.error.is_none());
        assert!(job.results.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        let parsed: JobStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, JobStatus::Failed);
    }
}
