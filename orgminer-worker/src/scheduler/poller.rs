//! Job poller
//!
//! Polls the queue for pending jobs and executes them. Each claimed job
//! runs in its own task; a semaphore bounds how many run at once, and a
//! job is only claimed when a slot is free so nothing sits Started while
//! waiting for capacity.

use anyhow::{Context, Result};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::service::JobExecutor;

pub struct JobPoller {
    config: Config,
    pool: PgPool,
    executor: Arc<JobExecutor>,
    semaphore: Arc<Semaphore>,
}

impl JobPoller {
    pub fn new(config: Config, pool: PgPool, executor: Arc<JobExecutor>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_parallel_jobs));
        Self {
            config,
            pool,
            executor,
            semaphore,
        }
    }

    /// Starts the polling loop
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting job poller (interval: {:?}, max parallel: {})",
            self.config.poll_interval, self.config.max_parallel_jobs
        );

        let mut interval = time::interval(self.config.poll_interval);

        loop {
            interval.tick().await;

            match self.poll_once().await {
                Ok(claimed) if claimed > 0 => {
                    info!("Claimed {} job(s) this cycle", claimed);
                }
                Ok(_) => debug!("No jobs available"),
                Err(e) => error!("Error during poll cycle: {:#}", e),
            }
        }
    }

    /// Claims and spawns as many pending jobs as free slots allow.
    async fn poll_once(&self) -> Result<usize> {
        let mut claimed = 0;

        while let Ok(permit) = self.semaphore.clone().try_acquire_owned() {
            let Some(job) = orgminer_store::jobs::claim_next(&self.pool)
                .await
                .context("Failed to claim next job")?
            else {
                break;
            };

            claimed += 1;
            let executor = Arc::clone(&self.executor);

            tokio::spawn(async move {
                let job_id = job.id;
                if let Err(e) = executor.execute(job).await {
                    error!("Failed to execute job {}: {:#}", job_id, e);
                }
                drop(permit);
            });
        }

        Ok(claimed)
    }
}
