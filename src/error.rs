//! Centralized error types for ytracker.
//!
//! This module provides a unified error hierarchy for applications built on the
//! client, with user-friendly error messages. All error types use `thiserror`.

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The crate-level error type.
///
/// Aggregates configuration and API errors while preserving the underlying
/// error for debugging.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
            },
            Error::Api(e) => match e {
                ApiError::Api { status, body } => match *status {
                    StatusCode::UNAUTHORIZED => {
                        "Authentication failed. Please check your token.".to_string()
                    }
                    StatusCode::FORBIDDEN => {
                        "Access denied. You don't have permission to access this resource."
                            .to_string()
                    }
                    StatusCode::NOT_FOUND => "The requested object was not found.".to_string(),
                    StatusCode::CONFLICT => {
                        "The object was modified by someone else. Please refresh and try again."
                            .to_string()
                    }
                    StatusCode::TOO_MANY_REQUESTS => {
                        "Too many requests. Please wait a moment and try again.".to_string()
                    }
                    s if s.is_server_error() => {
                        "Tracker server error. Please try again later.".to_string()
                    }
                    s => format!("Request rejected ({}): {}", s, body),
                },
                ApiError::Transport(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::ConnectionFailed(_) => {
                    "Could not connect to Tracker. Please check your URL and network.".to_string()
                }
                ApiError::Decode(_) => {
                    "Unexpected response from Tracker. Please try again.".to_string()
                }
                ApiError::Validation(msg) => format!("Invalid value: {}", msg),
                ApiError::MalformedRequest(msg) => format!("Invalid request: {}", msg),
                ApiError::Serialization(_) => {
                    "Could not encode the request. Internal error.".to_string()
                }
                ApiError::Io(_) => "Could not read the file to upload.".to_string(),
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Please reconfigure your profile.".to_string()
                }
            },
            Error::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors can be retried or the caller can continue working.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Api(ApiError::Api { status, .. }) => {
                *status == StatusCode::TOO_MANY_REQUESTS
                    || *status == StatusCode::NOT_FOUND
                    || *status == StatusCode::CONFLICT
                    || status.is_server_error()
            }
            Error::Api(ApiError::Transport(_)) => true,
            _ => false,
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::NoConfigDir) | Error::Config(ConfigError::ReadError(_)) => {
                Some("Create ytracker/config.toml in your configuration directory.")
            }
            Error::Api(e) if e.is_unauthorized() => {
                Some("Get a new OAuth token at https://oauth.yandex.ru or set YTRACKER_TOKEN.")
            }
            Error::Api(ApiError::Api { status, .. }) if *status == StatusCode::TOO_MANY_REQUESTS => {
                Some("Wait a few seconds and retry.")
            }
            Error::Api(ApiError::Transport(_)) | Error::Api(ApiError::ConnectionFailed(_)) => {
                Some("Check your internet connection and Tracker URL.")
            }
            Error::Api(ApiError::Keyring(_)) => {
                Some("Store the token again or set YTRACKER_TOKEN.")
            }
            _ => None,
        }
    }
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
