//! Analysis API Handlers
//!
//! HTTP endpoints for submitting analysis jobs and querying their status
//! and results.

use axum::{
    Json,
    extract::{Path, State},
};
use orgminer_core::dto::{AnalyzeRequest, JobReport, JobSubmitted, StatusResponse};
use uuid::Uuid;

use crate::AppState;
use crate::api::error::ApiResult;
use crate::service::analysis_service;

/// POST /analyze
/// Validate and enqueue a new analysis job
pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<Json<JobSubmitted>> {
    tracing::info!("Analysis requested for {}/{}", req.author, req.repository);

    let job = analysis_service::submit(&state.pool, req).await?;

    Ok(Json(JobSubmitted { job_id: job.id }))
}

/// GET /status/{job_id}
/// Report a job's current lifecycle state
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<StatusResponse>> {
    tracing::debug!("Status query for job: {}", job_id);

    let status = analysis_service::status(&state.pool, job_id).await?;

    Ok(Json(status))
}

/// GET /result/{job_id}
/// Return the terminal result document for a job
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<JobReport>> {
    tracing::debug!("Result query for job: {}", job_id);

    let report = analysis_service::result(&state.pool, &state.logs_dir, job_id).await?;

    Ok(Json(report))
}
