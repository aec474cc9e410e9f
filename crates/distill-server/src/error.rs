//! Error handling for the HTTP server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use distill_core::error::DistillError;
use serde::Serialize;
use std::fmt;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Malformed form input that never reached the analyzer.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

// Convert from distill-core errors
impl From<DistillError> for ApiError {
    fn from(err: DistillError) -> Self {
        let status = match &err {
            DistillError::InputMissing { .. }
            | DistillError::Validation { .. }
            | DistillError::EmptyExtraction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DistillError::Extraction(e) if e.is_fatal() => StatusCode::SERVICE_UNAVAILABLE,
            DistillError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DistillError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            DistillError::RateLimit { .. } => StatusCode::TOO_MANY_REQUESTS,
            DistillError::Completion { .. }
            | DistillError::Network { .. }
            | DistillError::Parse { .. } => StatusCode::BAD_GATEWAY,
            DistillError::Configuration(_)
            | DistillError::UnsupportedProvider { .. }
            | DistillError::Io(_)
            | DistillError::Serialization(_)
            | DistillError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut details = serde_json::json!({
            "warning": err.is_user_warning(),
            "fatal": err.is_fatal(),
        });
        if let Some(suggestion) = err.suggestion() {
            details["suggestion"] = suggestion.into();
        }
        if let Some(seconds) = err.retry_after() {
            details["retry_after"] = seconds.into();
        }

        // The user-facing message for a warning is the message itself
        let message = match &err {
            DistillError::InputMissing { message, .. }
            | DistillError::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(code = err.code().as_str(), error = %err, "Request failed");
        } else {
            tracing::warn!(code = err.code().as_str(), error = %err, "Request rejected");
        }

        ApiError::new(status, err.code().as_str(), message).with_details(details)
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
