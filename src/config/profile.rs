//! Tracker connection profile.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result, Settings};
use crate::api::{self, AuthScheme, ClientConfig, DEFAULT_BASE_URL};

/// Environment variable that overrides the keyring token.
pub const TOKEN_ENV_VAR: &str = "YTRACKER_TOKEN";

/// A Tracker profile configuration.
///
/// Profiles store connection details for one organization.
/// Tokens are stored separately in the OS keychain, or supplied through
/// [`TOKEN_ENV_VAR`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// API root. Defaults to the production API.
    #[serde(default = "default_url")]
    pub url: String,

    /// Yandex 360 organization id, sent as `X-Org-ID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,

    /// Yandex Cloud organization id, sent as `X-Cloud-Org-ID` when `org_id` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_org_id: Option<String>,

    /// Response language, `ru` or `en`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

fn default_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Profile {
    /// Create a new profile.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            org_id: None,
            cloud_org_id: None,
            language: None,
            auth_scheme: AuthScheme::default(),
        }
    }

    pub fn with_org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn with_cloud_org_id(mut self, cloud_org_id: impl Into<String>) -> Self {
        self.cloud_org_id = Some(cloud_org_id.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - The URL is non-empty and uses http or https
    /// - Organization ids, when present, are non-empty
    /// - The language, when present, is `ru` or `en`
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL cannot be empty",
                self.name
            )));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': URL must start with http:// or https://",
                self.name
            )));
        }

        for (field, value) in [("org_id", &self.org_id), ("cloud_org_id", &self.cloud_org_id)] {
            if matches!(value, Some(v) if v.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "profile '{}': {} cannot be empty",
                    self.name, field
                )));
            }
        }

        if let Some(language) = &self.language {
            if language != "ru" && language != "en" {
                return Err(ConfigError::ValidationError(format!(
                    "profile '{}': language must be 'ru' or 'en', got '{}'",
                    self.name, language
                )));
            }
        }

        Ok(())
    }

    /// Resolve the API token: `YTRACKER_TOKEN` if set, else the OS keyring.
    pub fn resolve_token(&self) -> api::error::Result<String> {
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => {
                debug!(profile = %self.name, "Using token from environment");
                Ok(token)
            }
            _ => api::auth::get_token(&self.name),
        }
    }

    /// Build the client configuration for this profile.
    pub fn client_config(&self, token: &str, settings: &Settings) -> ClientConfig {
        let mut config = ClientConfig::new(api::Auth::new(self.auth_scheme, token))
            .with_base_url(&self.url)
            .with_organization(self.org_id.as_deref(), self.cloud_org_id.as_deref())
            .with_timeout(Duration::from_secs(settings.timeout_secs))
            .with_page_policy(settings.page_policy);

        if let Some(language) = &self.language {
            config = config.with_language(language);
        }
        config
    }
}
