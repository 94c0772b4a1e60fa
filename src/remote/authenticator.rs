use std::sync::Arc;

use reqwest::Request;
use tracing::{debug, warn};

use crate::{
    management::SessionManager,
    remote::{
        auth::is_auth_endpoint,
        interceptor::{bearer_token, set_bearer},
    },
};

/// Responses in one auth chain after which no further retry is attempted.
pub const MAX_AUTH_RESPONSES: usize = 2;

/// Reacts to `401 Unauthorized` with one refresh and one retry.
///
/// The transport awaits [`authenticate`](Self::authenticate) inline, so the
/// failing request is held until the refresh completes. The wait is bounded
/// by the refresh timeout applied in [`crate::remote::AuthApi`], and
/// concurrent failures share a single refresh inside [`SessionManager`].
pub struct TokenAuthenticator {
    /// Same session the interceptor reads; refreshes go through its gate.
    session: Arc<SessionManager>,
}

impl TokenAuthenticator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Returns the request to retry, or `None` to let the 401 through.
    ///
    /// `response_count` is the number of responses in the chain including
    /// the one being handled, so the first failure passes `1`.
    pub async fn authenticate(&self, failed: &Request, response_count: usize) -> Option<Request> {
        if response_count >= MAX_AUTH_RESPONSES {
            debug!(url = %failed.url(), response_count, "retry already attempted, giving up");
            return None;
        }

        if is_auth_endpoint(failed.url()) {
            debug!(url = %failed.url(), "token endpoint rejected, not refreshing");
            return None;
        }

        let presented = bearer_token(failed.headers())?.to_string();

        let Some(token) = self.session.refresh_tokens_or_none(Some(&presented)).await else {
            warn!("refresh failed, clearing session");
            self.session.clear_tokens().await;
            return None;
        };

        let Some(mut retry) = failed.try_clone() else {
            debug!(url = %failed.url(), "request body cannot be replayed");
            return None;
        };
        if !set_bearer(retry.headers_mut(), &token) {
            return None;
        }
        Some(retry)
    }
}
