use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type RagResult<T> = Result<T, RagError>;

impl From<JsonRejection> for RagError {
    fn from(rejection: JsonRejection) -> Self {
        RagError::InvalidInput(rejection.body_text())
    }
}

impl From<ConfigError> for RagError {
    fn from(err: ConfigError) -> Self {
        RagError::Config(err.to_string())
    }
}

impl From<qdrant_client::QdrantError> for RagError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        RagError::Retrieval(format!("Qdrant error: {}", err))
    }
}

/// Convert RagError to AppError for standardized HTTP error responses
impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::InvalidInput(msg) => AppError::BadRequest(msg),
            RagError::Embedding(msg) => AppError::EmbeddingFailure(msg),
            RagError::Retrieval(msg) => AppError::RetrievalFailure(msg),
            RagError::Completion(msg) => AppError::CompletionFailure(msg),
            RagError::StreamInterrupted(msg) => AppError::StreamInterrupted(msg),
            RagError::Config(msg) => AppError::Config(msg),
        }
    }
}

impl IntoResponse for RagError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = RagError::InvalidInput("empty conversation".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_errors_are_bad_gateway() {
        for err in [
            RagError::Embedding("timeout".into()),
            RagError::Retrieval("404".into()),
            RagError::Completion("401".into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_config_error_conversion() {
        let err: RagError = ConfigError::MissingEnvVar("OPENAI_API_KEY".into()).into();
        assert!(matches!(err, RagError::Config(ref msg) if msg.contains("OPENAI_API_KEY")));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
