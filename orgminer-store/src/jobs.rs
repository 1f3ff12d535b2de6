//! Job queue and status operations
//!
//! The queue is the jobs table itself: enqueue inserts a Pending row,
//! dequeue claims the oldest Pending row with `FOR UPDATE SKIP LOCKED` so
//! concurrent workers never double-claim, and completion writes the terminal
//! record exactly once.

use chrono::{DateTime, NaiveDate, Utc};
use orgminer_core::domain::job::{Job, JobStatus};
use orgminer_core::domain::result::AnalysisResults;
use sqlx::PgPool;
use uuid::Uuid;

/// Enqueue a new job in the Pending state.
pub async fn enqueue(pool: &PgPool, job: &Job) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO jobs (id, author, repository, start_date, end_date, status, requested_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(job.id)
    .bind(&job.author)
    .bind(&job.repository)
    .bind(job.start_date)
    .bind(job.end_date)
    .bind(status_to_string(JobStatus::Pending))
    .bind(job.requested_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Claim the oldest Pending job, marking it Started.
///
/// The claim is the dequeue: the status flip and `started_at` stamp happen
/// in the same statement that selects the row, so the Started state (with
/// its full descriptive metadata) is visible to status queries before the
/// subprocess launches.
pub async fn claim_next(pool: &PgPool) -> Result<Option<Job>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET status = $1, started_at = $2
        WHERE id = (
            SELECT id FROM jobs
            WHERE status = $3
            ORDER BY requested_at ASC
            LIMIT 1
            FOR UPDATE SKIP LOCKED
        )
        RETURNING id, author, repository, start_date, end_date, status,
                  error, results, requested_at, started_at, completed_at
        "#,
    )
    .bind(status_to_string(JobStatus::Started))
    .bind(Utc::now())
    .bind(status_to_string(JobStatus::Pending))
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Write the terminal record for a job.
pub async fn complete(
    pool: &PgPool,
    job_id: Uuid,
    status: JobStatus,
    error: Option<&str>,
    results: Option<&AnalysisResults>,
) -> Result<(), sqlx::Error> {
    let results_value = results.map(|r| serde_json::to_value(r).unwrap());

    sqlx::query(
        r#"
        UPDATE jobs
        SET status = $1, error = $2, results = $3, completed_at = $4
        WHERE id = $5
        "#,
    )
    .bind(status_to_string(status))
    .bind(error)
    .bind(results_value)
    .bind(Utc::now())
    .bind(job_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Find a job by ID
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    let row = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT id, author, repository, start_date, end_date, status,
               error, results, requested_at, started_at, completed_at
        FROM jobs
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

// =============================================================================
// Helper Functions
// =============================================================================

fn status_to_string(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "PENDING",
        JobStatus::Started => "STARTED",
        JobStatus::Success => "SUCCESS",
        JobStatus::Failed => "FAILED",
    }
}

fn string_to_status(s: &str) -> JobStatus {
    match s {
        "STARTED" => JobStatus::Started,
        "SUCCESS" => JobStatus::Success,
        "FAILED" => JobStatus::Failed,
        _ => JobStatus::Pending,
    }
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    author: String,
    repository: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    error: Option<String>,
    results: Option<serde_json::Value>,
    requested_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        let results = row
            .results
            .and_then(|value| serde_json::from_value(value).ok());

        Job {
            id: row.id,
            author: row.author,
            repository: row.repository,
            start_date: row.start_date,
            end_date: row.end_date,
            status: string_to_status(&row.status),
            error: row.error,
            results,
            requested_at: row.requested_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Started,
            JobStatus::Success,
            JobStatus::Failed,
        ] {
            assert_eq!(string_to_status(status_to_string(status)), status);
        }
    }

    #[test]
    fn test_unknown_status_string_defaults_to_pending() {
        assert_eq!(string_to_status("SOMETHING_ELSE"), JobStatus::Pending);
    }
}
