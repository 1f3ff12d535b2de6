//! Orgminer Worker
//!
//! A worker that executes repository analysis jobs.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Workspace: Per-job working directories and best-effort cleanup
//! - Analyzer: The external analysis tool behind a subprocess boundary
//! - Readers: Parsers for the tool's pattern, metrics, and graph outputs
//! - Service: The job executor driving each job's lifecycle
//! - Scheduler: Queue polling with bounded parallelism
//!
//! The worker claims pending jobs from the shared store, runs the external
//! pattern-detection tool against an isolated working directory, merges the
//! tool's three output formats into one result document, and records the
//! terminal state after unconditional cleanup.

mod aggregate;
mod analyzer;
mod config;
mod failure;
mod readers;
mod scheduler;
mod service;
mod workspace;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::analyzer::{AnalysisTool, SubprocessTool};
use crate::config::Config;
use crate::scheduler::JobPoller;
use crate::service::JobExecutor;
use crate::workspace::DirectoryLayout;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orgminer_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Orgminer Worker");

    let config = load_config()?;
    info!(
        "Loaded configuration: worker_id={}, poll_interval={:?}, job_timeout={:?}",
        config.worker_id, config.poll_interval, config.job_timeout
    );

    let pool = orgminer_store::db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    // Idempotent; covers the worker starting before the orchestrator.
    orgminer_store::db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Database connection pool created");

    let tool: Arc<dyn AnalysisTool> =
        Arc::new(SubprocessTool::new(&config.tool_command).context("Invalid tool command")?);

    let layout = DirectoryLayout::new(
        config.csv_dir.clone(),
        config.data_dir.clone(),
        config.graphs_dir.clone(),
        config.repositories_dir.clone(),
    );

    let executor = Arc::new(JobExecutor::new(
        pool.clone(),
        layout,
        tool,
        config.logs_dir.clone(),
        config.job_timeout,
    ));

    info!("Worker initialized successfully");

    let poller = JobPoller::new(config, pool, executor);
    poller.run().await
}

/// Loads configuration from environment variables with fallback to defaults
fn load_config() -> Result<Config> {
    match Config::from_env() {
        Ok(config) => {
            config.validate()?;
            Ok(config)
        }
        Err(_) => {
            info!("Failed to load config from environment, using defaults");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
