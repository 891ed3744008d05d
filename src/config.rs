// Bookmark manager client configuration
// Loaded from the environment; every variable has a default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use tracing::info;

use crate::types::errors::ConfigError;

pub const API_URL_VAR: &str = "BOOKMARKS_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "BOOKMARKS_REQUEST_TIMEOUT_SECS";
pub const CONFIG_DIR_VAR: &str = "BOOKMARKS_CONFIG_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// Longer than the ~60s the hosted backend can take to wake up.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

/// Connection settings for the bookmark REST service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Where `preferences.json` lives; `None` uses the platform config dir.
    pub config_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            config_dir: None,
        }
    }
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match lookup(API_URL_VAR) {
            Some(url) => url,
            None => {
                info!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let config = Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            request_timeout,
            config_dir: lookup(CONFIG_DIR_VAR).map(PathBuf::from),
        };
        Ok(config)
    }

    /// Replaces the base URL, validating it the same way as the env value.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Checks the URL is absolute http(s) and strips any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
