//! Job executor
//!
//! Owns the full lifecycle of one claimed job: prepare the working
//! directory, run the analysis tool, classify the outcome, aggregate
//! results, and finish. Every terminal path runs the same sequence —
//! durable report copy, cleanup, terminal store record — so no outcome can
//! leave working state behind or skip the durable copy.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use orgminer_core::domain::job::{Job, JobStatus};
use orgminer_core::domain::result::AnalysisResults;
use orgminer_core::dto::JobReport;
use sqlx::PgPool;

use crate::aggregate::aggregate;
use crate::analyzer::{AnalysisTool, ToolOutcome};
use crate::failure::detect_tool_failure;
use crate::workspace::DirectoryLayout;

const TIMEOUT_ERROR: &str = "Analysis execution timeout!";
const GENERIC_ERROR: &str = "An Error Occurred during the analysis... Please try again later!";

pub struct JobExecutor {
    pool: PgPool,
    layout: DirectoryLayout,
    tool: Arc<dyn AnalysisTool>,
    logs_dir: PathBuf,
    job_timeout: Duration,
}

impl JobExecutor {
    pub fn new(
        pool: PgPool,
        layout: DirectoryLayout,
        tool: Arc<dyn AnalysisTool>,
        logs_dir: PathBuf,
        job_timeout: Duration,
    ) -> Self {
        Self {
            pool,
            layout,
            tool,
            logs_dir,
            job_timeout,
        }
    }

    /// Executes one claimed job to its terminal state.
    ///
    /// The job arrives already marked Started by the claim. Pipeline
    /// failures become Failed records with descriptive messages; only the
    /// final store write can surface as an error.
    pub async fn execute(&self, job: Job) -> Result<()> {
        info!(
            "Starting execution of job {} ({}/{}, window {} to {})",
            job.id, job.author, job.repository, job.start_date, job.end_date
        );

        let inputs = match self.layout.prepare(&job) {
            Ok(inputs) => inputs,
            Err(e) => {
                error!("Failed to prepare working directory for job {}: {:#}", job.id, e);
                return self
                    .finish_failed(job, format!("Failed to prepare working directory: {e}"))
                    .await;
            }
        };

        let outcome = match self.tool.run(&inputs.stdin_file, self.job_timeout).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to run analysis tool for job {}: {:#}", job.id, e);
                return self
                    .finish_failed(job, format!("Failed to run the analysis tool: {e}"))
                    .await;
            }
        };

        let combined_output = match outcome {
            ToolOutcome::TimedOut => {
                warn!("Job {} hit the execution timeout", job.id);
                return self.finish_failed(job, TIMEOUT_ERROR).await;
            }
            ToolOutcome::Completed { combined_output } => combined_output,
        };

        debug!(
            "Analysis tool finished for job {} ({} bytes of output)",
            job.id,
            combined_output.len()
        );

        if let Some(message) = detect_tool_failure(&combined_output) {
            info!("Job {} failed with known tool error: {}", job.id, message);
            // Result files are unreliable after a known failure; skip the
            // readers entirely.
            return self.finish_failed(job, message).await;
        }

        let results = aggregate(
            &inputs.job_dir.join("output.csv"),
            &self.layout.metrics_path(&job.author, &job.repository),
            &self.layout.graph_dir(&job.author, &job.repository),
            &job.author,
            &job.repository,
        );

        if !results.is_complete() {
            warn!("Job {} produced an incomplete result aggregate", job.id);
            return self.finish_failed(job, GENERIC_ERROR).await;
        }

        self.finish_success(job, results).await
    }

    async fn finish_success(&self, mut job: Job, results: AnalysisResults) -> Result<()> {
        job.status = JobStatus::Success;
        job.results = Some(results);
        self.finish(job).await
    }

    async fn finish_failed(&self, mut job: Job, error: impl Into<String>) -> Result<()> {
        job.status = JobStatus::Failed;
        job.error = Some(error.into());
        self.finish(job).await
    }

    /// Terminal sequence shared by every outcome: durable report copy,
    /// cleanup, then the terminal store record. Copy and cleanup failures
    /// never mask the job's actual outcome.
    async fn finish(&self, job: Job) -> Result<()> {
        let report = JobReport::from(&job);
        if let Err(e) = write_report_copy(&self.logs_dir, &report) {
            warn!("Failed to write durable result copy for job {}: {:#}", job.id, e);
        }

        self.layout.cleanup(job.id, &job.author, &job.repository);

        orgminer_store::jobs::complete(
            &self.pool,
            job.id,
            job.status,
            job.error.as_deref(),
            job.results.as_ref(),
        )
        .await
        .context("Failed to record terminal job state")?;

        info!("Job {} completed with status {:?}", job.id, job.status);
        Ok(())
    }
}

/// Writes the per-job result document under the logs directory, for
/// retrieval even after the queue backend's own result expiry.
fn write_report_copy(logs_dir: &Path, report: &JobReport) -> Result<()> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let path = logs_dir.join(format!("{}.json", report.job_id));
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgminer_core::dates;
    use tempfile::TempDir;

    #[test]
    fn test_report_copy_is_readable_json() {
        let logs = TempDir::new().unwrap();
        let end = dates::parse_end_date("2019-05-01").unwrap();
        let mut job = Job::new("bundler".to_string(), "bundler".to_string(), end);
        job.status = JobStatus::Failed;
        job.error = Some(TIMEOUT_ERROR.to_string());

        let report = JobReport::from(&job);
        write_report_copy(logs.path(), &report).unwrap();

        let path = logs.path().join(format!("{}.json", job.id));
        let text = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["status"], "FAILED");
        assert_eq!(value["author"], "bundler");
        assert_eq!(value["start_date"], "2019-01-31");
        assert_eq!(value["error"], TIMEOUT_ERROR);
        assert!(value.get("results").is_none());
    }

    #[test]
    fn test_report_copy_overwrites_existing_file() {
        let logs = TempDir::new().unwrap();
        let end = dates::parse_end_date("2024-07-01").unwrap();
        let mut job = Job::new("alice".to_string(), "demo".to_string(), end);
        job.status = JobStatus::Failed;
        job.error = Some("first".to_string());

        write_report_copy(logs.path(), &JobReport::from(&job)).unwrap();
        job.error = Some("second".to_string());
        write_report_copy(logs.path(), &JobReport::from(&job)).unwrap();

        let text =
            fs::read_to_string(logs.path().join(format!("{}.json", job.id))).unwrap();
        assert!(text.contains("second"));
    }
}
