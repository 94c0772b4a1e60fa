//! Session credential lifecycle.
//!
//! [`SessionManager`] owns the access/refresh token pair. Readers (the
//! request interceptor) take a cheap read lock on the in-memory copy;
//! refreshes are serialized behind a single async lock so that concurrent
//! authentication failures share one refresh call.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ApiError, StoreError},
    management::store::CredentialStore,
    remote::AuthApi,
    types::{Credential, TokenPair},
    utils,
};

/// Refresh this many seconds before the known expiry.
pub const EXPIRY_BUFFER_SECS: i64 = 240;

impl Credential {
    /// Builds a credential from a token response.
    ///
    /// Expiry comes from `expiresIn` when present, else from the JWT `exp`
    /// claim, else stays unknown.
    pub fn from_pair(pair: TokenPair) -> Self {
        let access_expiry = pair
            .expires_in
            .map(|secs| utils::now_timestamp() + secs)
            .or_else(|| utils::jwt_expiry(&pair.access_token));

        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            access_expiry,
        }
    }

    /// Whether the access token expires within `buffer_secs`. Unknown expiry
    /// counts as valid.
    pub fn expires_within(&self, buffer_secs: i64) -> bool {
        self.access_expiry
            .is_some_and(|expiry| utils::now_timestamp() + buffer_secs >= expiry)
    }
}

/// Outcome of the most recent refresh attempt, guarded by the refresh lock.
#[derive(Default)]
struct RefreshState {
    /// Token handed out by the last attempt, `None` when it failed.
    last_outcome: Option<String>,
    /// Access token whose refresh token the server rejected. Refreshing it
    /// again can only fail the same way.
    rejected_token: Option<String>,
}

/// Owner of the session credential.
///
/// The credential lives behind a read/write lock so the interceptor can
/// read it without waiting. `refresh_lock` admits one refresh at a time and
/// holds the outcome of the last one; `refresh_generation` counts finished
/// attempts so callers that queued behind an attempt take its outcome
/// instead of starting their own.
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    auth: AuthApi,
    credential: RwLock<Option<Credential>>,
    refresh_lock: Mutex<RefreshState>,
    refresh_generation: AtomicU64,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        auth: AuthApi,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            store,
            auth,
            credential: RwLock::new(credential),
            refresh_lock: Mutex::new(RefreshState::default()),
            refresh_generation: AtomicU64::new(0),
        }
    }

    /// Restores the persisted credential, if any.
    pub async fn load(store: Arc<dyn CredentialStore>, auth: AuthApi) -> Result<Self, StoreError> {
        let credential = store.load().await?;
        Ok(Self::new(store, auth, credential))
    }

    pub fn access_token(&self) -> Option<String> {
        self.credential
            .read()
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.read().is_some()
    }

    /// Replaces the credential in memory and in the store.
    pub async fn save_credential(&self, credential: Credential) -> Result<(), StoreError> {
        *self.credential.write() = Some(credential.clone());
        self.store.save(&credential).await
    }

    /// Exchanges a Google ID token for a session.
    pub async fn login_with_google(&self, id_token: &str) -> Result<Credential, ApiError> {
        let _guard = self.refresh_lock.lock().await;
        let pair = self.auth.login_google(id_token).await?;
        let credential = Credential::from_pair(pair);
        self.save_credential(credential.clone()).await?;
        info!("logged in");
        Ok(credential)
    }

    /// Returns the current access token, refreshing it first when the known
    /// expiry is inside [`EXPIRY_BUFFER_SECS`].
    ///
    /// A failed proactive refresh falls back to the current token; the
    /// server's 401 then goes through the regular refresh-and-retry path.
    pub async fn valid_access_token(&self) -> Option<String> {
        let current = self.credential()?;
        if !current.expires_within(EXPIRY_BUFFER_SECS) {
            return Some(current.access_token);
        }

        debug!("access token close to expiry, refreshing proactively");
        match self.refresh_tokens_or_none(Some(&current.access_token)).await {
            Some(token) => Some(token),
            None => self.access_token(),
        }
    }

    /// Exchanges the stored refresh token for a new pair.
    ///
    /// `stale` is the access token the caller saw rejected (or about to
    /// expire). When another caller already replaced it while this one
    /// waited for the lock, the current token is returned without a second
    /// network call. Callers that queued behind a refresh attempt share its
    /// outcome, success or failure, and a token whose refresh was rejected
    /// is never refreshed again.
    ///
    /// Every failure yields `None` and leaves the stored credential as it
    /// was; clearing is the caller's decision.
    pub async fn refresh_tokens_or_none(&self, stale: Option<&str>) -> Option<String> {
        let observed = self.refresh_generation.load(Ordering::Acquire);
        let mut state = self.refresh_lock.lock().await;

        let current = self.credential()?;
        if let Some(stale) = stale {
            if current.access_token != stale {
                debug!("token already refreshed by a concurrent request");
                return Some(current.access_token);
            }
        }

        if self.refresh_generation.load(Ordering::Acquire) != observed {
            debug!("reusing the outcome of a concurrent refresh");
            return state.last_outcome.clone();
        }

        if state.rejected_token.as_deref() == Some(current.access_token.as_str()) {
            debug!("refresh token already rejected");
            return None;
        }

        let outcome = match self.exchange_refresh_token(&current).await {
            Ok(token) => {
                state.rejected_token = None;
                Some(token)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                if e.is_auth_error() {
                    state.rejected_token = Some(current.access_token);
                }
                None
            }
        };

        state.last_outcome = outcome.clone();
        self.refresh_generation.fetch_add(1, Ordering::Release);
        outcome
    }

    async fn exchange_refresh_token(&self, current: &Credential) -> Result<String, ApiError> {
        if current.refresh_token.trim().is_empty() {
            return Err(ApiError::Unauthorized("no refresh token stored".to_string()));
        }

        let pair = self.auth.refresh(&current.refresh_token).await?;
        let mut credential = Credential::from_pair(pair);
        if credential.refresh_token.trim().is_empty() {
            credential.refresh_token = current.refresh_token.clone();
        }
        let token = credential.access_token.clone();

        if let Err(e) = self.save_credential(credential).await {
            warn!(error = %e, "refreshed credential could not be persisted");
        }
        debug!("access token refreshed");
        Ok(token)
    }

    /// Erases the credential from memory and from the store.
    pub async fn clear_tokens(&self) {
        *self.credential.write() = None;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "stored credential could not be removed");
        }
    }
}
