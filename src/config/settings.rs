//! Client-wide settings.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::PagePolicy;

/// Settings shared by all profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The name of the default profile to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Behavior of multi-page fetches when a later page fails.
    pub page_policy: PagePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            timeout_secs: 30,
            page_policy: PagePolicy::Strict,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
