//! Configuration management for the Harmonia client.
//!
//! Configuration is read from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file under `<data_local_dir>/harmonia/`
//! 3. Defaults for everything except the API URL

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "HARMONIA_API_URL";
pub const ENV_CLIENT_NAME: &str = "HARMONIA_CLIENT_NAME";
pub const ENV_REQUEST_TIMEOUT: &str = "HARMONIA_REQUEST_TIMEOUT_SECS";
pub const ENV_REFRESH_TIMEOUT: &str = "HARMONIA_REFRESH_TIMEOUT_SECS";
pub const ENV_MAX_RETRIES: &str = "HARMONIA_MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "HARMONIA_RETRY_DELAY_MS";
pub const ENV_DOWNLOAD_DIR: &str = "HARMONIA_DOWNLOAD_DIR";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Loads environment variables from `<data_local_dir>/harmonia/.env`.
///
/// The directory is created when missing so users have an obvious place to
/// put the file. A missing `.env` file is not an error; a malformed one is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/harmonia/.env`
/// - macOS: `~/Library/Application Support/harmonia/.env`
/// - Windows: `%LOCALAPPDATA%/harmonia/.env`
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Env(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| ConfigError::Env(e.to_string()))
}

/// Root of everything harmonia keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("harmonia");
    path
}

/// Runtime settings for the API client and the download cache.
#[derive(Debug, Clone)]
pub struct Config {
    /// Versioned base URL; always ends with `/` so relative joins keep the
    /// version segment.
    pub api_url: Url,
    /// Value of the identifying `X-Client-Name` header.
    pub client_name: String,
    pub request_timeout: Duration,
    /// Upper bound on a single token refresh, including the wait for a
    /// refresh already in flight.
    pub refresh_timeout: Duration,
    /// Retries for 429/502/503/504 responses.
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub download_dir: PathBuf,
}

impl Config {
    /// Builds a configuration with defaults for everything but the API URL.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            client_name: default_client_name(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            refresh_timeout: Duration::from_secs(DEFAULT_REFRESH_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            download_dir: data_dir().join("downloads"),
        })
    }

    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] first to pick up the `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env::var(ENV_API_URL).map_err(|_| ConfigError::Missing(ENV_API_URL))?;
        let mut config = Self::new(&api_url)?;

        if let Ok(name) = env::var(ENV_CLIENT_NAME) {
            if !name.trim().is_empty() {
                config.client_name = name.trim().to_string();
            }
        }
        if let Some(secs) = parse_var::<u64>(ENV_REQUEST_TIMEOUT)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(ENV_REFRESH_TIMEOUT)? {
            config.refresh_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<u32>(ENV_MAX_RETRIES)? {
            config.max_retries = retries;
        }
        if let Some(ms) = parse_var::<u64>(ENV_RETRY_DELAY)? {
            config.retry_delay = Duration::from_millis(ms);
        }
        if let Ok(dir) = env::var(ENV_DOWNLOAD_DIR) {
            if !dir.trim().is_empty() {
                config.download_dir = PathBuf::from(dir.trim());
            }
        }

        Ok(config)
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = delay;
        self
    }

    /// Resolves an endpoint path like `Songs/42` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_url.join(path.trim_start_matches('/'))
    }
}

fn default_client_name() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| ConfigError::Invalid {
        name: ENV_API_URL,
        value: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            name: ENV_API_URL,
            value: raw.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                name,
                value,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
