//! ytracker - a typed async client for the Yandex Tracker REST API v2.
//!
//! ```no_run
//! use ytracker::api::{ClientConfig, IssueSearchRequest, TrackerClient};
//!
//! # async fn run() -> ytracker::Result<()> {
//! let client = TrackerClient::new(ClientConfig::oauth("token").with_org_id("12345"))?;
//! let issues = client
//!     .search_all_issues(&IssueSearchRequest::queue("TEST"))
//!     .await?;
//! for issue in issues {
//!     println!("{}", issue);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ApiError, ClientConfig, TrackerClient};
pub use config::{Config, ConfigError, Profile, Settings};
pub use error::{Error, Result};

use tracing::info;

/// Connect using a profile: validate it, resolve its token, and check the
/// connection against `/myself`.
pub async fn connect(profile: &Profile, settings: &Settings) -> Result<TrackerClient> {
    profile.validate()?;
    let token = profile.resolve_token()?;
    let client = TrackerClient::connect(profile.client_config(&token, settings)).await?;
    info!(profile = %profile.name, "Connected");
    Ok(client)
}

/// Load the configuration file and connect with its active profile.
pub async fn connect_default() -> Result<TrackerClient> {
    let config = Config::load()?;
    let profile = config.active_profile()?;
    connect(profile, &config.settings).await
}
