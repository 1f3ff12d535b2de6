//! Analysis Service
//!
//! Business logic for job submission and status/result queries.

use std::path::Path;

use orgminer_core::dates;
use orgminer_core::domain::job::{Job, JobStatus};
use orgminer_core::dto::{AnalyzeRequest, JobReport, PendingMeta, StatusResponse};
use sqlx::PgPool;
use uuid::Uuid;

/// Service error type
#[derive(Debug)]
pub enum AnalysisError {
    InvalidEndDate(String),
    ResultNotFound(Uuid),
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for AnalysisError {
    fn from(err: sqlx::Error) -> Self {
        AnalysisError::DatabaseError(err)
    }
}

/// Validate and enqueue a new analysis job.
///
/// The end date is validated before any job exists; an invalid date is the
/// one failure that propagates to the caller instead of producing a job
/// record. The pending metadata blob makes author/repository/dates
/// available to status queries before a worker picks the job up.
pub async fn submit(pool: &PgPool, req: AnalyzeRequest) -> Result<Job, AnalysisError> {
    let end_date = dates::parse_end_date(&req.end_date)
        .map_err(|_| AnalysisError::InvalidEndDate(req.end_date.clone()))?;

    let job = Job::new(req.author, req.repository, end_date);

    orgminer_store::jobs::enqueue(pool, &job).await?;
    orgminer_store::meta::set_pending_meta(pool, &PendingMeta::from(&job)).await?;

    tracing::info!(
        "Job submitted: {} ({}/{}, end date {})",
        job.id,
        job.author,
        job.repository,
        job.end_date
    );

    Ok(job)
}

/// Report a job's current state.
///
/// Falls back to the pending metadata record when the backend has no row
/// for the id; an id known to neither reports Pending with no descriptive
/// fields, matching the queue backend's behavior for unknown ids.
pub async fn status(pool: &PgPool, job_id: Uuid) -> Result<StatusResponse, AnalysisError> {
    if let Some(job) = orgminer_store::jobs::find_by_id(pool, job_id).await? {
        return Ok(StatusResponse {
            job_id,
            status: job.status,
            author: Some(job.author),
            repository: Some(job.repository),
            start_date: Some(job.start_date),
            end_date: Some(job.end_date),
        });
    }

    if let Some(meta) = orgminer_store::meta::get_pending_meta(pool, job_id).await? {
        return Ok(StatusResponse {
            job_id,
            status: JobStatus::Pending,
            author: Some(meta.author),
            repository: Some(meta.repository),
            start_date: Some(meta.start_date),
            end_date: Some(meta.end_date),
        });
    }

    Ok(StatusResponse {
        job_id,
        status: JobStatus::Pending,
        author: None,
        repository: None,
        start_date: None,
        end_date: None,
    })
}

/// Return the terminal result document for a job.
///
/// Reads the store first; if the backend no longer has the record, falls
/// back to the worker's durable per-job copy under the logs directory.
pub async fn result(
    pool: &PgPool,
    logs_dir: &Path,
    job_id: Uuid,
) -> Result<JobReport, AnalysisError> {
    if let Some(job) = orgminer_store::jobs::find_by_id(pool, job_id).await? {
        if job.is_terminal() {
            return Ok(JobReport::from(&job));
        }
    }

    let log_path = logs_dir.join(format!("{job_id}.json"));
    if let Ok(text) = std::fs::read_to_string(&log_path) {
        if let Ok(report) = serde_json::from_str::<JobReport>(&text) {
            return Ok(report);
        }
    }

    Err(AnalysisError::ResultNotFound(job_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgminer_core::domain::result::{
        AnalysisResults, GraphResult, MergedGraph, MetricsReport, MetricsResult,
    };
    use tempfile::TempDir;

    fn terminal_report() -> JobReport {
        let end = dates::parse_end_date("2019-05-01").unwrap();
        let mut job = Job::new("bundler".to_string(), "bundler".to_string(), end);
        job.status = JobStatus::Success;
        job.results = Some(AnalysisResults {
            patterns: vec![],
            metrics: MetricsResult::Report(MetricsReport::default()),
            graph: GraphResult::Graph(MergedGraph::default()),
        });
        JobReport::from(&job)
    }

    #[test]
    fn test_durable_copy_round_trips_through_the_result_fallback() {
        let logs = TempDir::new().unwrap();
        let report = terminal_report();

        let path = logs.path().join(format!("{}.json", report.job_id));
        std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: JobReport = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed.job_id, report.job_id);
        assert_eq!(parsed.status, JobStatus::Success);
        assert_eq!(parsed.start_date.to_string(), "2019-01-31");
        assert!(parsed.results.is_some());
    }
}
