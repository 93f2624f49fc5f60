//! Tracker API client and types.
//!
//! This module provides the interface for communicating with the Tracker REST API v2.

pub mod auth;
mod client;
pub mod error;
pub mod pagination;
pub mod request;
pub mod types;
pub mod urls;
pub mod values;

pub use auth::{Auth, AuthScheme};
pub use client::{
    resolve_language, user_path_id, ClientConfig, Organization, TrackerClient, DEFAULT_BASE_URL,
    DEFAULT_LANGUAGE,
};
pub use error::ApiError;
pub use pagination::{CommentCursor, Page, PagePolicy, PageRequest, PageResponse};
pub use request::{ApiRequest, ApiResponse, RequestBody, ResponseMeta};
pub use types::*;
pub use values::{CommentExpand, PriorityLevel, Resolution, TransitionKind};
