//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - a string representation for clients (e.g., "INVALID_INPUT")
//! - an integer code for logs (e.g., 1001)
//! - a default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidInput;
//! assert_eq!(code.as_str(), "INVALID_INPUT");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.default_message(), "Request input is invalid");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Request content is missing, empty, or otherwise unusable
    InvalidInput,

    /// Requested resource was not found
    NotFound,

    /// HTTP method not supported on this route
    MethodNotAllowed,

    // Upstream service errors (6000s)
    /// The embedding service call failed
    EmbeddingFailure,

    /// The vector index query failed
    RetrievalFailure,

    /// The completion service call failed before streaming began
    CompletionFailure,

    /// The completion stream faulted after the response started
    StreamInterrupted,

    // Configuration errors (7000s)
    /// Service is misconfigured
    ConfigError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::EmbeddingFailure => "EMBEDDING_FAILURE",
            Self::RetrievalFailure => "RETRIEVAL_FAILURE",
            Self::CompletionFailure => "COMPLETION_FAILURE",
            Self::StreamInterrupted => "STREAM_INTERRUPTED",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// Ranges:
    /// - 1000-1999: Client errors
    /// - 6000-6999: Upstream service errors
    /// - 7000-7999: Configuration errors
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidInput => 1001,
            Self::NotFound => 1004,
            Self::MethodNotAllowed => 1012,

            Self::EmbeddingFailure => 6001,
            Self::RetrievalFailure => 6002,
            Self::CompletionFailure => 6003,
            Self::StreamInterrupted => 6004,

            Self::ConfigError => 7001,
        }
    }

    /// Default user-facing message. Handlers may override with specifics.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::InvalidInput => "Request input is invalid",
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::EmbeddingFailure => "The embedding service request failed",
            Self::RetrievalFailure => "The vector index request failed",
            Self::CompletionFailure => "The completion service request failed",
            Self::StreamInterrupted => "The completion stream was interrupted",
            Self::ConfigError => "Service configuration error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
