//! API error types for the Tracker client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when interacting with the Tracker API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or HTTP transport failure (DNS, connect, timeout). Never retried.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    ///
    /// `body` is the raw response text, passed through without parsing.
    #[error("Request failed with status {status}: {body}")]
    Api {
        /// HTTP status returned by the API.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A symbolic value or argument was rejected before sending.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request could not be assembled (unfilled placeholder, bad base URL).
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a file for upload failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// Connection validation failed.
    #[error("Connection validation failed: {0}")]
    ConnectionFailed(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an API error from a status code and the raw body text.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        ApiError::Api {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status, if this error came from an API response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// The raw response body, if this error came from an API response.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Returns true for 409, which the API uses for duplicate `unique` values
    /// and stale component versions.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }
}
