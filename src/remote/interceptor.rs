use std::sync::Arc;

use reqwest::{
    Request,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    management::SessionManager,
    remote::{
        auth::is_auth_endpoint,
        http::{CLIENT_NAME_HEADER, client_name_value},
    },
};

/// Decorates outgoing requests with the client header and the bearer token.
///
/// Token endpoints are never given an `Authorization` header. No I/O happens
/// here; the token is read from the session's in-memory copy.
pub struct AuthInterceptor {
    session: Arc<SessionManager>,
    client_name: HeaderValue,
}

impl AuthInterceptor {
    pub fn new(session: Arc<SessionManager>, client_name: &str) -> Self {
        Self {
            session,
            client_name: client_name_value(client_name),
        }
    }

    pub fn intercept(&self, mut request: Request) -> Request {
        let excluded = is_auth_endpoint(request.url());
        let headers = request.headers_mut();
        headers.insert(CLIENT_NAME_HEADER, self.client_name.clone());

        if excluded {
            headers.remove(AUTHORIZATION);
            return request;
        }

        if let Some(token) = self.session.access_token() {
            set_bearer(headers, &token);
        }
        request
    }
}

/// Sets `Authorization: Bearer <token>`. Tokens that are not valid header
/// values are dropped.
pub(crate) fn set_bearer(headers: &mut HeaderMap, token: &str) -> bool {
    match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            true
        }
        Err(_) => {
            tracing::warn!("access token is not a valid header value");
            false
        }
    }
}

/// Token carried by a request's `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
