use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Duration;

use narration_core::NarrationError;
use serde::Serialize;
use thiserror::Error;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Narration error: {0}")]
    Narration(#[from] NarrationError),

    #[error("Narration timed out after {0:?}")]
    NarrationTimeout(Duration),

    #[error("Speech synthesis is not configured")]
    NarrationUnavailable,

    #[error("Login required to continue the conversation")]
    LoginRequired,
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
            ApiError::Narration(NarrationError::InvalidCredentials) => {
                tracing::error!("speech endpoint rejected the API key");
                (
                    StatusCode::BAD_GATEWAY,
                    "Speech service rejected the configured API key".to_string(),
                )
            }
            ApiError::Narration(e) => {
                tracing::error!("Narration error: {}", e);
                (StatusCode::BAD_GATEWAY, format!("Narration error: {}", e))
            }
            ApiError::NarrationTimeout(limit) => {
                tracing::error!("Narration timed out after {:?}", limit);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("Narration timed out after {:?}", limit),
                )
            }
            ApiError::NarrationUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Speech synthesis is not configured".to_string(),
            ),
            ApiError::LoginRequired => (
                StatusCode::UNAUTHORIZED,
                "Please log in to continue the conversation".to_string(),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}
