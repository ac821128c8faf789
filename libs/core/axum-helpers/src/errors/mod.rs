pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logs (e.g., 6001)
/// - `error`: machine-readable identifier (e.g., "EMBEDDING_FAILURE")
/// - `message`: human-readable message
/// - `details`: optional structured details
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "INVALID_INPUT",
///   "message": "conversation must contain at least one message"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Embedding service failure: {0}")]
    EmbeddingFailure(String),

    #[error("Vector index failure: {0}")]
    RetrievalFailure(String),

    #[error("Completion service failure: {0}")]
    CompletionFailure(String),

    #[error("Completion stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status and error code this error maps to.
    pub fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput),
            AppError::EmbeddingFailure(_) => (StatusCode::BAD_GATEWAY, ErrorCode::EmbeddingFailure),
            AppError::RetrievalFailure(_) => (StatusCode::BAD_GATEWAY, ErrorCode::RetrievalFailure),
            AppError::CompletionFailure(_) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::CompletionFailure)
            }
            AppError::StreamInterrupted(_) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::StreamInterrupted)
            }
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::ConfigError),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = code.code(), "Bad request: {}", msg);
                msg
            }
            AppError::EmbeddingFailure(msg)
            | AppError::RetrievalFailure(msg)
            | AppError::CompletionFailure(msg)
            | AppError::StreamInterrupted(msg) => {
                tracing::error!(error_code = code.code(), error = %code, "Upstream failure: {}", msg);
                format!("{}: {}", code.default_message(), msg)
            }
            AppError::Config(msg) => {
                tracing::error!(error_code = code.code(), "Configuration error: {}", msg);
                code.default_message().to_string()
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_maps_to_400_invalid_input() {
        let (status, code) = AppError::BadRequest("empty".into()).status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_upstream_failures_map_to_bad_gateway_with_distinct_codes() {
        let cases = [
            (AppError::EmbeddingFailure("x".into()), ErrorCode::EmbeddingFailure),
            (AppError::RetrievalFailure("x".into()), ErrorCode::RetrievalFailure),
            (AppError::CompletionFailure("x".into()), ErrorCode::CompletionFailure),
        ];

        for (err, expected) in cases {
            let (status, code) = err.status_and_code();
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(code, expected);
        }
    }

    #[test]
    fn test_every_variant_maps_to_its_own_code() {
        let cases = [
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST, 1001),
            (AppError::EmbeddingFailure("x".into()), StatusCode::BAD_GATEWAY, 6001),
            (AppError::RetrievalFailure("x".into()), StatusCode::BAD_GATEWAY, 6002),
            (AppError::CompletionFailure("x".into()), StatusCode::BAD_GATEWAY, 6003),
            (AppError::StreamInterrupted("x".into()), StatusCode::BAD_GATEWAY, 6004),
            (AppError::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR, 7001),
        ];

        for (err, expected_status, expected_code) in cases {
            let (status, code) = err.status_and_code();
            assert_eq!(status, expected_status);
            assert_eq!(code.code(), expected_code);
        }
    }

    #[test]
    fn test_config_error_hides_details() {
        let response = AppError::Config("OPENAI_API_KEY not set".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_serialization_skips_empty_details() {
        let body = ErrorResponse::new(ErrorCode::InvalidInput, "nope");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 1001);
        assert_eq!(json["error"], "INVALID_INPUT");
        assert_eq!(json["message"], "nope");
        assert!(json.get("details").is_none());
    }
}
