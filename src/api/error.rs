//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::report::ReportError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("No technical records collected yet")]
    NoData,
    #[error("No report compiled yet")]
    NoReport,
    #[error("Report generation failed: {0}")]
    ReportFailed(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found or already ended".to_string(),
            ),
            ApiError::NoData => (
                StatusCode::CONFLICT,
                "NO_DATA",
                "Hable con el doctor primero.".to_string(),
            ),
            ApiError::NoReport => (
                StatusCode::NOT_FOUND,
                "NO_REPORT",
                "No report has been compiled for this session".to_string(),
            ),
            ApiError::ReportFailed(detail) => {
                tracing::error!(detail = %detail, "report generation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "REPORT_FAILED",
                    "Report generation failed; please try again".to_string(),
                )
            }
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionNotFound(_) => ApiError::SessionNotFound,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoData => ApiError::NoData,
            ReportError::GenerationFailed(cause) => ApiError::ReportFailed(cause),
        }
    }
}
