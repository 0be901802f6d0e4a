//! Configuration management module
//!
//! Handles loading, saving, and validation of the API connection settings
//! and user preferences.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::timer::{MAX_REST_SECS, MIN_REST_SECS, REST_STEP_SECS};
use crate::{MysetError, Result, API_ROOT_ENV, APP_NAME, CONFIG_FILE, LOG_FILE};

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub training: TrainingConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

/// Connection to the training backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Sent as `X-CSRFToken`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    /// Sent as the `Cookie` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    /// Attempts for read-only fetches
    pub fetch_attempts: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            timeout_secs: 10,
            csrf_token: None,
            session_cookie: None,
            fetch_attempts: 3,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Default rest between sets
    pub rest_secs: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self { rest_secs: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event poll interval of the terminal loop
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

impl UiConfig {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `mysetrun=debug`
    pub level: String,
    /// Log file; defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogConfig {
    /// Configured log file or `$DATA_DIR/mysetrun/mysetrun.log`
    pub fn file_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        let data_dir = dirs::data_dir().ok_or_else(|| {
            MysetError::Config("Unable to determine data directory".to_string())
        })?;
        Ok(data_dir.join(APP_NAME).join(LOG_FILE))
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(MysetError::Config("API base URL must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MysetError::Config(format!(
                "API base URL must start with http:// or https://: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(MysetError::Config(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        const MAX_TIMEOUT_SECS: u64 = 300;
        if self.api.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(MysetError::Config(format!(
                "API timeout too long: {}s (max: {}s)",
                self.api.timeout_secs, MAX_TIMEOUT_SECS
            )));
        }

        if self.api.fetch_attempts == 0 || self.api.fetch_attempts > 10 {
            return Err(MysetError::Config(
                "Fetch attempts must be between 1 and 10".to_string(),
            ));
        }

        let rest = self.training.rest_secs;
        if !(MIN_REST_SECS..=MAX_REST_SECS).contains(&rest) {
            return Err(MysetError::Config(format!(
                "Rest must be between {} and {} seconds, got {}",
                MIN_REST_SECS, MAX_REST_SECS, rest
            )));
        }
        if rest % REST_STEP_SECS != 0 {
            return Err(MysetError::Config(format!(
                "Rest must be a multiple of {} seconds, got {}",
                REST_STEP_SECS, rest
            )));
        }

        if !(16..=2000).contains(&self.ui.tick_rate_ms) {
            return Err(MysetError::Config(
                "Tick rate must be between 16 and 2000 ms".to_string(),
            ));
        }

        if self.log.level.trim().is_empty() {
            return Err(MysetError::Config("Log level must not be empty".to_string()));
        }

        Ok(())
    }

    /// Set the API root
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api.base_url = url.into();
        self
    }

    /// Set the default rest between sets
    pub fn with_rest_secs(mut self, secs: u64) -> Self {
        self.training.rest_secs = secs;
        self
    }

    /// Set the log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log.level = level.into();
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.api.csrf_token = Some(token.into());
        self
    }

    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.api.session_cookie = Some(cookie.into());
        self
    }

    /// Apply an API root taken from the environment, if set and non-empty
    pub fn with_api_root_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    /// Load configuration from the standard config file location.
    /// Returns default configuration if the file doesn't exist.
    /// `MYSETRUN_API_ROOT` overrides the base URL.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_file_path()?)?
            .with_api_root_override(std::env::var(API_ROOT_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            MysetError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            MysetError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                MysetError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|e| {
            MysetError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/mysetrun/mysetrun.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            MysetError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
