//! Error types shared by the remote client, the managers and the stores.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by [`crate::remote::ApiClient`] and the resource managers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response that has no more specific variant.
    #[error("API error ({status}) at {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The server rejected the request and the session is still in place.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh token was rejected and the stored credential was cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not logged in, run `harmonia auth login` first")]
    NotAuthenticated,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Song {0} has no playable URL")]
    NoPlayableUrl(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Whether the error means the user has to authenticate again.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::SessionExpired | Self::NotAuthenticated
        )
    }

    /// Retryable status codes: 429, 502, 503 and 504.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 429 | 502 | 503 | 504)
    }
}

/// Errors from the on-disk credential store and download index.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot load environment file: {0}")]
    Env(String),
}
