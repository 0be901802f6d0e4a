//! Logging setup
//!
//! The terminal is owned by the TUI, so logs go to a file. `RUST_LOG` takes
//! precedence over the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;
use crate::{MysetError, Result};

/// Filter from `RUST_LOG`, falling back to `level`
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level)
        .map_err(|e| MysetError::Config(format!("Invalid log level '{}': {}", level, e)))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Install the global subscriber. Returns the log file path.
pub fn init(config: &LogConfig) -> Result<PathBuf> {
    let path = config.file_path()?;
    let file = open_log_file(&path)?;
    let filter = build_filter(&config.level)?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| MysetError::Config(format!("Failed to install logger: {}", e)))?;

    info!(version = env!("CARGO_PKG_VERSION"), log = %path.display(), "logging started");
    Ok(path)
}
