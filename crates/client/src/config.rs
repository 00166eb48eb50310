//! Client configuration, read from the environment.

use std::time::Duration;

use thiserror::Error;

pub const API_URL_VAR: &str = "STOREFRONT_API_URL";
pub const TIMEOUT_VAR: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{TIMEOUT_VAR} must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub api_url: String,
    /// Per-request timeout; `None` leaves reqwest's default (no timeout).
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            request_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{API_URL_VAR} not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });
        let mut config = Self::new(api_url.trim());

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}
