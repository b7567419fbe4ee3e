//! Error types for familypulse-survey
//!
//! Every handler error renders as `{"error": {"code", "message"}}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use familypulse_common::validation::ValidationViolation;
use serde_json::json;
use thiserror::Error;

use crate::services::ParseFailure;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., a summary is already being generated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body missing, not JSON, or of the wrong shape
    ///
    /// Keeps axum's status (400, 415 or 422).
    #[error("Invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),

    /// Member record rejected before reaching the store (400)
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationViolation),

    /// Smart Fill could not produce a partial record
    #[error("Smart fill failed: {0}")]
    SmartFill(#[from] ParseFailure),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::InvalidBody(rejection) => (rejection.status(), "INVALID_BODY"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            ApiError::SmartFill(failure) => match failure {
                ParseFailure::EmptyInput => (StatusCode::BAD_REQUEST, "EMPTY_INPUT"),
                ParseFailure::NotConfigured => {
                    (StatusCode::SERVICE_UNAVAILABLE, "TEXT_SERVICE_NOT_CONFIGURED")
                }
                ParseFailure::Transport(_) | ParseFailure::Service { .. } => {
                    (StatusCode::BAD_GATEWAY, "TEXT_SERVICE_ERROR")
                }
                ParseFailure::EmptyResponse
                | ParseFailure::Malformed(_)
                | ParseFailure::SchemaViolation(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_FAILED")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        let message = match &self {
            ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg.clone(),
            ApiError::InvalidBody(rejection) => rejection.body_text(),
            ApiError::Validation(violation) => violation.to_string(),
            ApiError::SmartFill(failure) => failure.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
