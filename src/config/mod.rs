//! Configuration management for ytracker.
//!
//! This module handles loading, saving, and managing user configuration
//! including connection profiles and client settings. The file lives at
//! `<config dir>/ytracker/config.toml`.

mod profile;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use profile::{Profile, TOKEN_ENV_VAR};
pub use settings::Settings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    NoConfigDir,

    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    ValidationError(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The on-disk configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub profiles: Vec<Profile>,
}

impl Config {
    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("ytracker").join("config.toml"))
    }

    /// Load from the default location. A missing file yields the default config.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`. A missing file yields the default config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;

        debug!(
            path = %path.display(),
            profiles = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Validate and write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(ConfigError::WriteError)?;

        debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Validate every profile, name uniqueness, and the default profile reference.
    pub fn validate(&self) -> Result<()> {
        let mut names = std::collections::HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !names.insert(profile.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
        }

        if let Some(default) = &self.settings.default_profile {
            if !names.contains(default.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' does not exist",
                    default
                )));
            }
        }

        self.settings.validate()
    }

    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// The default profile, or the only profile if exactly one exists.
    pub fn active_profile(&self) -> Result<&Profile> {
        match &self.settings.default_profile {
            Some(name) => self.profile(name),
            None if self.profiles.len() == 1 => Ok(&self.profiles[0]),
            None => Err(ConfigError::ProfileNotFound(
                "no default profile configured".to_string(),
            )),
        }
    }

    /// Add a profile. The name must be unused.
    pub fn add_profile(&mut self, profile: Profile) -> Result<()> {
        profile.validate()?;
        if self.profiles.iter().any(|p| p.name == profile.name) {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}' already exists",
                profile.name
            )));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Remove a profile, clearing the default if it pointed at it.
    pub fn remove_profile(&mut self, name: &str) -> Result<Profile> {
        let index = self
            .profiles
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        if self.settings.default_profile.as_deref() == Some(name) {
            self.settings.default_profile = None;
        }
        Ok(self.profiles.remove(index))
    }
}
