use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::{
    config::Config,
    error::{ApiError, Result},
    remote::http::{self, CLIENT_NAME_HEADER},
    types::{GoogleLoginRequest, RefreshRequest, TokenPair},
};

pub const REFRESH_PATH: &str = "Auth/Refresh";
pub const GOOGLE_LOGIN_PATH: &str = "Auth/Google";

/// Whether `url` targets one of the token endpoints.
///
/// These endpoints are never decorated with a bearer token and never
/// trigger a refresh-and-retry.
pub fn is_auth_endpoint(url: &Url) -> bool {
    let path = url.path().trim_end_matches('/').to_ascii_lowercase();
    [REFRESH_PATH, GOOGLE_LOGIN_PATH]
        .iter()
        .any(|endpoint| path.ends_with(&format!("/{}", endpoint.to_ascii_lowercase())))
}

/// Raw calls to the token endpoints.
///
/// Uses its own HTTP client so that a refresh never passes through the
/// authenticated transport that is waiting on it.
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: Client,
    config: Config,
}

impl AuthApi {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http: http::build_http_client(config)?,
            config: config.clone(),
        })
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// Bounded by `refresh_timeout`; expiry yields [`ApiError::Timeout`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.exchange(REFRESH_PATH, &body).await
    }

    /// Logs in with a Google ID token.
    pub async fn login_google(&self, id_token: &str) -> Result<TokenPair> {
        let body = GoogleLoginRequest {
            id_token: id_token.to_string(),
        };
        self.exchange(GOOGLE_LOGIN_PATH, &body).await
    }

    async fn exchange<B: Serialize>(&self, path: &str, body: &B) -> Result<TokenPair> {
        let url = self
            .config
            .endpoint(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))?;

        let request = self
            .http
            .post(url)
            .header(
                CLIENT_NAME_HEADER,
                http::client_name_value(&self.config.client_name),
            )
            .json(body)
            .build()?;

        let timeout = self.config.refresh_timeout;
        let response = tokio::time::timeout(timeout, self.http.execute(request))
            .await
            .map_err(|_| ApiError::Timeout(timeout))??;

        match response.status() {
            status if status.is_success() => {
                let pair: TokenPair = http::decode_json(response).await?;
                if pair.access_token.trim().is_empty() {
                    return Err(ApiError::InvalidResponse(format!(
                        "{path}: empty access token"
                    )));
                }
                Ok(pair)
            }
            StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN => {
                Err(ApiError::Unauthorized(format!("{path} rejected")))
            }
            _ => Err(http::status_error(response).await),
        }
    }
}
