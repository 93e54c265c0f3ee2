//! # Client Configuration Module
//!
//! This module handles loading and managing configuration for the Sesplan client.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `SESPLAN_API_URL`: Base URL of the REST API (default: "https://api.sesplan.space")
//! - `SESPLAN_TOKEN_PATH`: File holding the bearer token (default: `<config dir>/sesplan/token`)
//! - `SESPLAN_TIMEZONE`: IANA timezone the availability grid is shown in (default: "UTC")
//! - `SESPLAN_REQUEST_TIMEOUT_SECONDS`: Per-request timeout; unset means no explicit timeout
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use tracing::Level;

/// Default location of the hosted API.
pub const DEFAULT_API_URL: &str = "https://api.sesplan.space";

/// Prefix of every versioned endpoint.
pub const API_PREFIX: &str = "/V1";

/// Configuration for the Sesplan API client
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use sesplan_client::config::ClientConfig;
///
/// fn example() -> Result<()> {
///     let config = ClientConfig::from_env()?;
///     println!("Talking to {}", config.api_url("/sessions/1"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,

    /// Where the bearer token is persisted between runs
    pub token_path: PathBuf,

    /// Timezone the availability grid is rendered in
    pub timezone: Tz,

    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,

    /// Log level for the application
    pub log_level: Level,
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - No token path is configured and no user config directory exists
    /// - `SESPLAN_TIMEZONE` is not a known IANA timezone
    /// - `SESPLAN_REQUEST_TIMEOUT_SECONDS` is not a whole number
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("SESPLAN_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let token_path = match env::var("SESPLAN_TOKEN_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_path()?,
        };

        let timezone = env::var("SESPLAN_TIMEZONE")
            .unwrap_or_else(|_| "UTC".to_string())
            .parse::<Tz>()
            .map_err(|e| eyre!("Invalid SESPLAN_TIMEZONE value: {}", e))?;

        let request_timeout = env::var("SESPLAN_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .map(|secs| secs.parse::<u64>())
            .transpose()
            .wrap_err("Invalid SESPLAN_REQUEST_TIMEOUT_SECONDS value")?
            .map(Duration::from_secs);

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        Ok(Self::new(base_url, token_path)
            .with_timezone(timezone)
            .with_request_timeout(request_timeout)
            .with_log_level(log_level))
    }

    /// Builds a configuration with defaults for everything but the URL and token path.
    pub fn new(base_url: impl Into<String>, token_path: impl Into<PathBuf>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token_path: token_path.into(),
            timezone: Tz::UTC,
            request_timeout: None,
            log_level: Level::INFO,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Full URL of a versioned endpoint, e.g. `api_url("/sessions/1")`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

fn default_token_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| eyre!("Could not determine config directory"))?;
    Ok(dir.join("sesplan").join("token"))
}

fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::new("https://api.example.com/", "/tmp/token");
        assert_eq!(config.api_url("/sessions/1"), "https://api.example.com/V1/sessions/1");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("loud"), Level::INFO);
    }
}
