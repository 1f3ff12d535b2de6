//! API Module
//!
//! HTTP API layer for the orchestrator. Thin endpoint wrappers only; the
//! submission/status/result rules live in the service module.

pub mod analysis;
pub mod error;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Analysis endpoints
        .route("/analyze", post(analysis::analyze))
        .route("/status/{job_id}", get(analysis::get_status))
        .route("/result/{job_id}", get(analysis::get_result))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
