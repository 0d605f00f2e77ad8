//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the word API, without trailing slash.
    pub api_url: Option<String>,
    pub auth_token: String,
    pub db_path: PathBuf,
    pub fetch_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Env vars:
    /// - VOCAB_API_URL: Base URL of the word API (needed for network commands)
    /// - VOCAB_AUTH_TOKEN: Bearer token sent with every request
    /// - VOCAB_DB_PATH: Local database file
    /// - VOCAB_FETCH_TIMEOUT_SECS: Fetch timeout, `0` disables it
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("VOCAB_API_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().trim_end_matches('/').to_string());

        let auth_token = lookup("VOCAB_AUTH_TOKEN").unwrap_or_default();

        let db_path = lookup("VOCAB_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let fetch_timeout = match lookup("VOCAB_FETCH_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "VOCAB_FETCH_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => Some(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
        };

        Ok(Self {
            api_url,
            auth_token,
            db_path,
            fetch_timeout,
        })
    }

    /// API URL, required by commands that talk to the network.
    pub fn require_api_url(&self) -> Result<&str, ConfigError> {
        self.api_url
            .as_deref()
            .ok_or(ConfigError::Missing("VOCAB_API_URL"))
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-cards")
        .join("vocab.db")
}
