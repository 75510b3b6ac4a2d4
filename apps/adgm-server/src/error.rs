//! Error types for the ADGM server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compliance_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Analysis timeout after {0}ms")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ServerError::UnknownProcess(name) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_PROCESS",
                format!(
                    "Unknown process '{}'. Use GET /api/processes for the supported processes.",
                    name
                ),
            ),
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg.clone())
            }
            ServerError::Timeout(ms) => (
                StatusCode::REQUEST_TIMEOUT,
                "TIMEOUT",
                format!("Analysis timeout after {}ms", ms),
            ),
            ServerError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnknownProcess(name) => ServerError::UnknownProcess(name),
            other => ServerError::Internal(other.to_string()),
        }
    }
}
