//! Subscriber setup for applications embedding the client.
//!
//! The client only emits `tracing` events. Nothing is recorded until the host
//! installs a subscriber, either its own or one of the helpers here. Both honor
//! `RUST_LOG` and fall back to [`DEFAULT_LOG_FILTER`].

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

pub const DEFAULT_LOG_FILTER: &str = "ytracker=info,warn";

const LOG_FILE_PREFIX: &str = "ytracker.log";

/// Log to a daily rotating file under [`log_directory`].
pub fn init() -> anyhow::Result<()> {
    let dir = log_directory().context("Could not determine local data directory")?;
    init_in(&dir)
}

/// Log to a daily rotating file under `dir`, creating it if needed.
///
/// # Errors
///
/// Fails if `dir` cannot be created or a global subscriber is already set.
pub fn init_in(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);
    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter())
        .try_init()?;

    tracing::debug!(log_dir = %dir.display(), version = env!("CARGO_PKG_VERSION"), "File logging enabled");
    Ok(())
}

/// Log to stderr, for command-line tools.
pub fn init_stderr() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter())
        .try_init()?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// `<local data dir>/ytracker/logs`, if the platform has a local data dir.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("ytracker").join("logs"))
}
