use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Request, Response, StatusCode, Url, header::RETRY_AFTER};
use serde::{Serialize, de::DeserializeOwned};
use tokio::{sync::OnceCell, time::sleep};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{ApiError, Result},
    management::{CredentialStore, SessionManager},
    remote::{
        AuthApi, AuthInterceptor, MusicService, TokenAuthenticator, auth::is_auth_endpoint, http,
    },
};

/// Longest `Retry-After` we are willing to sleep through.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Entry point handed to every manager.
///
/// The HTTP client and the [`MusicService`] are built on the first call to
/// [`service`](Self::service) and shared for as long as the `ApiClient`
/// lives.
pub struct ApiClient {
    config: Config,
    session: Arc<SessionManager>,
    service: OnceCell<MusicService>,
}

impl ApiClient {
    pub fn new(config: Config, session: Arc<SessionManager>) -> Self {
        Self {
            config,
            session,
            service: OnceCell::new(),
        }
    }

    /// Restores the session from `store` and wraps it in a client.
    pub async fn connect(config: Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let auth = AuthApi::new(&config)?;
        let session = SessionManager::load(store, auth).await?;
        Ok(Self::new(config, Arc::new(session)))
    }

    pub async fn service(&self) -> Result<&MusicService> {
        self.service
            .get_or_try_init(|| async {
                debug!(api_url = %self.config.api_url, "building HTTP client");
                MusicService::build(&self.config, Arc::clone(&self.session))
            })
            .await
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Authenticated request pipeline: interceptor, send, authenticator, retry.
///
/// The interceptor and the authenticator are shared with [`MusicService`]
/// so callers can reach the exact instances the pipeline uses. Throttled
/// and gateway failures are replayed only for idempotent methods.
pub(crate) struct Transport {
    http: Client,
    config: Config,
    /// Read before and after a request to tell `NotAuthenticated` and
    /// `SessionExpired` apart from a plain rejection.
    session: Arc<SessionManager>,
    pub(crate) interceptor: Arc<AuthInterceptor>,
    pub(crate) authenticator: Arc<TokenAuthenticator>,
}

impl Transport {
    pub(crate) fn new(config: &Config, session: Arc<SessionManager>) -> Result<Self> {
        Ok(Self {
            http: http::build_http_client(config)?,
            config: config.clone(),
            interceptor: Arc::new(AuthInterceptor::new(
                Arc::clone(&session),
                &config.client_name,
            )),
            authenticator: Arc::new(TokenAuthenticator::new(Arc::clone(&session))),
            session,
        })
    }

    /// Base URL with percent-encoded path segments appended.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.config.api_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let request = self.http.get(self.url(segments)?).build()?;
        http::decode_json(self.execute(request).await?).await
    }

    pub(crate) async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(segments)?).json(body).build()?;
        http::decode_json(self.execute(request).await?).await
    }

    /// Sends a request without body and ignores the response body.
    pub(crate) async fn send_empty(&self, method: Method, segments: &[&str]) -> Result<()> {
        let request = self.http.request(method, self.url(segments)?).build()?;
        self.execute(request).await?;
        Ok(())
    }

    /// Downloads a presigned URL. The URL carries its own credentials, so
    /// the request skips the interceptor.
    pub(crate) async fn fetch_presigned(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(http::status_error(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Sends `request` and maps any non-success status to an error.
    pub(crate) async fn execute(&self, request: Request) -> Result<Response> {
        let had_session = self.session.is_authenticated();
        let response = self.send(request).await?;
        if response.status().is_success() {
            return Ok(response);
        }

        Err(match http::status_error(response).await {
            ApiError::Unauthorized(_) if !had_session => ApiError::NotAuthenticated,
            ApiError::Unauthorized(_) if !self.session.is_authenticated() => {
                ApiError::SessionExpired
            }
            other => other,
        })
    }

    async fn send(&self, request: Request) -> Result<Response> {
        if !is_auth_endpoint(request.url()) {
            self.session.valid_access_token().await;
        }

        let idempotent = is_idempotent(request.method());
        let mut request = self.interceptor.intercept(request);
        let mut response_count = 0;
        let mut retries = 0;

        loop {
            let replay = request.try_clone();
            let response = self.http.execute(request).await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED {
                response_count += 1;
                let Some(original) = replay else {
                    return Ok(response);
                };
                match self.authenticator.authenticate(&original, response_count).await {
                    Some(retry) => {
                        request = retry;
                        continue;
                    }
                    None => return Ok(response),
                }
            }

            if idempotent
                && ApiError::is_retryable_status(status.as_u16())
                && retries < self.config.max_retries
            {
                let (Some(next), Some(delay)) = (replay, self.retry_delay(&response, retries))
                else {
                    return Ok(response);
                };

                retries += 1;
                warn!(
                    url = %response.url(),
                    status = status.as_u16(),
                    attempt = retries,
                    "retrying after {:?}",
                    delay
                );
                sleep(delay).await;
                request = next;
                continue;
            }

            return Ok(response);
        }
    }

    fn retry_delay(&self, response: &Response, attempt: u32) -> Option<Duration> {
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if let Some(secs) = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
            {
                if secs > MAX_RETRY_AFTER_SECS {
                    warn!(
                        "Retry after has reached an abnormal high of {} seconds, giving up",
                        secs
                    );
                    return None;
                }
                return Some(Duration::from_secs(secs));
            }
        }

        Some(self.config.retry_delay * 2u32.saturating_pow(attempt))
    }
}

/// Methods that may be replayed after a 429 or gateway error. A `POST` that
/// timed out at the gateway may already have been applied.
fn is_idempotent(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS
    )
}
