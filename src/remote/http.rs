use reqwest::{Client, Response, StatusCode, header::HeaderValue};
use serde::de::DeserializeOwned;

use crate::{
    config::Config,
    error::{ApiError, Result},
};

/// Identifying header attached to every request.
pub const CLIENT_NAME_HEADER: &str = "x-client-name";

const MAX_ERROR_BODY: usize = 200;

pub(crate) fn build_http_client(config: &Config) -> Result<Client> {
    Ok(Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

pub(crate) fn client_name_value(name: &str) -> HeaderValue {
    HeaderValue::from_str(name).unwrap_or_else(|_| {
        tracing::warn!(client_name = name, "client name is not a valid header value");
        HeaderValue::from_static(env!("CARGO_PKG_NAME"))
    })
}

/// Reads a successful response body as JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let url = response.url().to_string();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        ApiError::InvalidResponse(format!("{url}: {e} (body: {})", truncate(&body)))
    })
}

/// Converts a non-success response into the matching [`ApiError`].
///
/// 401 becomes [`ApiError::Unauthorized`]; callers that know the session was
/// cleared map it further to [`ApiError::SessionExpired`].
pub(crate) async fn status_error(response: Response) -> ApiError {
    let status = response.status();
    let url = response.url().to_string();
    let message = response
        .text()
        .await
        .map(|body| truncate(&body))
        .unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(if message.is_empty() {
            url
        } else {
            message
        }),
        StatusCode::NOT_FOUND => ApiError::NotFound(url),
        _ => ApiError::Api {
            status: status.as_u16(),
            url,
            message,
        },
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
