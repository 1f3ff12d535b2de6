//! DTOs shared between the orchestrator and worker
//!
//! These are the wire and on-disk document shapes: the analyze request, the
//! status payload, the pending-state metadata blob, and the terminal job
//! report (identical in shape to the API response and the durable copy).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobStatus};
use crate::domain::result::AnalysisResults;

/// Request to analyze a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub author: String,
    pub repository: String,
    pub end_date: String,
}

/// Response to an accepted analyze request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmitted {
    pub job_id: Uuid,
}

/// Status query payload.
///
/// Descriptive fields are omitted when the backend has no record of the
/// job beyond its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Metadata blob written to the key-value store at submission so status
/// queries during the Pending window can report descriptive fields before a
/// worker has picked the job up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMeta {
    pub job_id: Uuid,
    pub author: String,
    pub repository: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PendingMeta {
    /// Key under which the blob is stored, a fixed prefix plus the job id.
    pub fn store_key(job_id: Uuid) -> String {
        format!("job-meta-{job_id}")
    }
}

impl From<&Job> for PendingMeta {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            author: job.author.clone(),
            repository: job.repository.clone(),
            start_date: job.start_date,
            end_date: job.end_date,
        }
    }
}

/// The terminal result document for one job.
///
/// Written once to durable storage on any terminal outcome and returned
/// verbatim from the result endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub author: String,
    pub repository: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<AnalysisResults>,
}

impl From<&Job> for JobReport {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            author: job.author.clone(),
            repository: job.repository.clone(),
            start_date: job.start_date,
            end_date: job.end_date,
            error: job.error.clone(),
            results: job.results.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates;

    #[test]
    fn test_pending_meta_store_key_prefix() {
        let id = Uuid::new_v4();
        assert_eq!(PendingMeta::store_key(id), format!("job-meta-{id}"));
    }

    #[test]
    fn test_report_omits_absent_fields() {
        let end = dates::parse_end_date("2019-05-01").unwrap();
        let job = Job::new("bundler".to_string(), "bundler".to_string(), end);
        let report = JobReport::from(&job);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["start_date"], "2019-01-31");
        assert!(value.get("error").is_none());
        assert!(value.get("results").is_none());
    }
}
