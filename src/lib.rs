//! MYSETRUN - guided myset training in the terminal
//!
//! A TUI companion that walks through a saved workout template set by set,
//! runs rest intervals between sets and saves the finished session to the
//! training backend.

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod util;

/// Common error type
#[derive(Debug, thiserror::Error)]
pub enum MysetError {
    /// Local I/O failed (terminal, config or log file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Network failure or non-2xx response from the training API
    #[error("API error{}: {message}", http_status_suffix(.status))]
    Api {
        status: Option<u16>,
        message: String,
    },
    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
    /// Configuration validation or parsing error
    #[error("Configuration error: {0}")]
    Config(String),
    /// Requested step transition is not allowed from the current step
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    /// Set values do not fit the exercise they are merged into
    #[error("Invalid set: {0}")]
    InvalidSet(String),
    /// TUI rendering or interaction error
    #[error("TUI error: {0}")]
    Tui(String),
    /// Operation was abandoned before it completed
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl From<reqwest::Error> for MysetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return MysetError::Decode(err.to_string());
        }
        MysetError::Api {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MysetError {
    fn from(err: serde_json::Error) -> Self {
        MysetError::Decode(format!("JSON error: {}", err))
    }
}

impl From<toml::de::Error> for MysetError {
    fn from(err: toml::de::Error) -> Self {
        MysetError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for MysetError {
    fn from(err: toml::ser::Error) -> Self {
        MysetError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for MYSETRUN operations
pub type Result<T> = std::result::Result<T, MysetError>;

/// Error handling utilities
pub mod error {
    use super::{MysetError, Result};
    use std::time::Duration;
    use tokio::time::sleep;
    use tracing::warn;

    /// Retry configuration for read-only fetches
    #[derive(Debug, Clone)]
    pub struct RetryConfig {
        /// Maximum number of attempts, including the first one
        pub max_attempts: usize,
        /// Initial delay between retries
        pub initial_delay: Duration,
        /// Multiplier for exponential backoff
        pub backoff_multiplier: f64,
        /// Maximum delay between retries
        pub max_delay: Duration,
    }

    impl Default for RetryConfig {
        fn default() -> Self {
            Self {
                max_attempts: 3,
                initial_delay: Duration::from_millis(200),
                backoff_multiplier: 2.0,
                max_delay: Duration::from_secs(2),
            }
        }
    }

    impl RetryConfig {
        /// Same backoff, different attempt budget
        pub fn with_attempts(attempts: usize) -> Self {
            Self {
                max_attempts: attempts.max(1),
                ..Self::default()
            }
        }
    }

    /// Retry a fallible async operation with exponential backoff.
    ///
    /// Only meant for idempotent reads. Saving a session is never retried
    /// automatically.
    pub async fn retry_async<F, Fut, T>(operation: F, config: RetryConfig) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut delay = config.initial_delay;
        let mut last_error = None;

        for attempt in 0..config.max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !is_retryable_error(&err) {
                        return Err(err);
                    }
                    warn!(attempt = attempt + 1, error = %err, "request failed");
                    last_error = Some(err);

                    if attempt + 1 < config.max_attempts {
                        sleep(delay).await;
                        delay = std::cmp::min(
                            Duration::from_millis(
                                (delay.as_millis() as f64 * config.backoff_multiplier) as u64,
                            ),
                            config.max_delay,
                        );
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| MysetError::Cancelled("retry made no attempts".to_string())))
    }

    /// Check if an error is worth another attempt
    pub fn is_retryable_error(error: &MysetError) -> bool {
        match error {
            // Client errors will not change on retry; server errors and
            // transport failures might.
            MysetError::Api { status: Some(code), .. } => *code >= 500 || *code == 429,
            MysetError::Api { status: None, .. } => true,
            MysetError::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::ConnectionReset
            ),
            MysetError::Decode(_)
            | MysetError::Config(_)
            | MysetError::InvalidTransition(_)
            | MysetError::InvalidSet(_)
            | MysetError::Tui(_)
            | MysetError::Cancelled(_) => false,
        }
    }

    /// Convert error to user-friendly message with suggestions
    pub fn user_friendly_message(error: &MysetError) -> String {
        match error {
            MysetError::Api { status: Some(401), .. } | MysetError::Api { status: Some(403), .. } => {
                "Not signed in. Check the session cookie and CSRF token in your config.".to_string()
            }
            MysetError::Api { status: Some(404), .. } => {
                "That myset no longer exists on the server.".to_string()
            }
            MysetError::Api { status: None, .. } => {
                "Could not reach the training server. Check your connection and try again."
                    .to_string()
            }
            MysetError::Api { .. } => "The training server rejected the request. Try again.".to_string(),
            MysetError::Decode(_) => {
                "The server answered with data this version does not understand.".to_string()
            }
            MysetError::Config(msg) => format!("Configuration error: {}. Check your settings.", msg),
            MysetError::Cancelled(_) => "Operation was cancelled.".to_string(),
            _ => error.to_string(),
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "mysetrun";
pub const CONFIG_FILE: &str = "mysetrun.toml";
pub const LOG_FILE: &str = "mysetrun.log";
pub const API_ROOT_ENV: &str = "MYSETRUN_API_ROOT";
