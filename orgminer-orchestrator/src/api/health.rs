//! Health Check API Handler

use axum::{Json, response::IntoResponse};

/// GET /health
/// Health check endpoint for monitoring
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
