use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The completion provider failed; the message is the provider's text.
    #[error("Completion provider error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Error response structure
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => {
                tracing::error!("Completion provider error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Completion provider error: {}", msg),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<llm_core::LlmError> for ApiError {
    fn from(e: llm_core::LlmError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<tts_core::SlotError> for ApiError {
    fn from(e: tts_core::SlotError) -> Self {
        ApiError::InternalError(e.to_string())
    }
}
