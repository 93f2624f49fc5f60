//! Authentication handling for the Tracker API.
//!
//! Tracker accepts either an OAuth token (`Authorization: OAuth <token>`) or a
//! Yandex Cloud IAM token (`Authorization: Bearer <token>`). Tokens can be kept
//! in the OS keyring, one entry per profile.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// The keyring service name for ytracker tokens.
const KEYRING_SERVICE: &str = "ytracker";

/// Scheme prefix used in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// Personal OAuth token.
    #[default]
    OAuth,
    /// Short-lived IAM token.
    Bearer,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::OAuth => "OAuth",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthScheme {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "oauth" => Ok(AuthScheme::OAuth),
            "bearer" | "iam" => Ok(AuthScheme::Bearer),
            other => Err(ApiError::Validation(format!(
                "unknown auth scheme: {}",
                other
            ))),
        }
    }
}

/// Authentication credentials for Tracker.
#[derive(Clone)]
pub struct Auth {
    scheme: AuthScheme,
    /// The complete `Authorization` header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from a scheme and token.
    pub fn new(scheme: AuthScheme, token: &str) -> Self {
        Self {
            scheme,
            auth_header: build_auth_header(scheme, token),
        }
    }

    /// Create authentication from a profile using the OS keyring.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be retrieved from the keyring.
    pub fn from_keyring(profile_name: &str, scheme: AuthScheme) -> Result<Self> {
        let token = get_token(profile_name)?;
        Ok(Self::new(scheme, &token))
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("scheme", &self.scheme)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

fn build_auth_header(scheme: AuthScheme, token: &str) -> String {
    format!("{} {}", scheme.as_str(), token.trim())
}

/// Store an API token in the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be stored in the keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(token)
        .map_err(|e| ApiError::Keyring(format!("failed to store token: {}", e)))?;

    Ok(())
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns an error if the token cannot be retrieved from the keyring.
pub fn get_token(profile_name: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

/// Delete an API token from the OS keyring.
pub fn delete_token(profile_name: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .delete_password()
        .map_err(|e| ApiError::Keyring(format!("failed to delete token: {}", e)))?;

    Ok(())
}

/// Check if a token exists in the OS keyring for a profile.
pub fn has_token(profile_name: &str) -> bool {
    get_token(profile_name).is_ok()
}
