//! API Error Handling
//!
//! Converts service-layer failures into HTTP responses: invalid submissions
//! become 400s, a missing terminal result becomes a 404, and database
//! failures are logged and hidden behind a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::analysis_service::AnalysisError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    DatabaseError(sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidEndDate(raw) => {
                ApiError::BadRequest(format!("Invalid end_date '{raw}': expected YYYY-MM-DD"))
            }
            AnalysisError::ResultNotFound(id) => {
                ApiError::NotFound(format!("Result not found for job_id: {id}"))
            }
            AnalysisError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
