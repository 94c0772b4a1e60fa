mod common;

use common::*;
use harmonia::remote::{AuthInterceptor, CLIENT_NAME_HEADER, auth::is_auth_endpoint, bearer_token};
use reqwest::{
    Client, Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use wiremock::MockServer;

fn request(url: &str) -> reqwest::Request {
    Client::new().get(url).build().expect("request builds")
}

#[tokio::test]
async fn test_bearer_attached_to_regular_requests() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let session = session_with(&config, store_with(Some(credential("tok", "ref"))));
    let interceptor = AuthInterceptor::new(session, CLIENT_NAME);

    let out = interceptor.intercept(request(&format!("{}Songs/1", config.api_url)));

    let values: Vec<_> = out.headers().get_all(AUTHORIZATION).iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "Bearer tok");
    assert_eq!(out.headers()[CLIENT_NAME_HEADER], CLIENT_NAME);
}

#[tokio::test]
async fn test_existing_authorization_is_replaced() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let session = session_with(&config, store_with(Some(credential("fresh", "ref"))));
    let interceptor = AuthInterceptor::new(session, CLIENT_NAME);

    let mut req = request(&format!("{}Playlists/me", config.api_url));
    req.headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
    let out = interceptor.intercept(req);

    assert_eq!(out.headers().get_all(AUTHORIZATION).iter().count(), 1);
    assert_eq!(bearer_token(out.headers()), Some("fresh"));
}

#[tokio::test]
async fn test_token_endpoints_never_get_a_bearer() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let session = session_with(&config, store_with(Some(credential("tok", "ref"))));
    let interceptor = AuthInterceptor::new(session, CLIENT_NAME);

    for path in ["Auth/Refresh", "Auth/Google", "auth/refresh", "AUTH/GOOGLE/"] {
        let mut req = request(&format!("{}{}", config.api_url, path));
        req.headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer leaked"));

        let out = interceptor.intercept(req);

        assert!(
            out.headers().get(AUTHORIZATION).is_none(),
            "{path} must not carry Authorization"
        );
        assert_eq!(out.headers()[CLIENT_NAME_HEADER], CLIENT_NAME);
    }
}

#[tokio::test]
async fn test_no_session_means_no_bearer() {
    let server = MockServer::start().await;
    let config = test_config(&server);
    let session = session_with(&config, store_with(None));
    let interceptor = AuthInterceptor::new(session, CLIENT_NAME);

    let out = interceptor.intercept(request(&format!("{}Genres", config.api_url)));

    assert!(out.headers().get(AUTHORIZATION).is_none());
    assert_eq!(out.headers()[CLIENT_NAME_HEADER], CLIENT_NAME);
}

#[test]
fn test_is_auth_endpoint() {
    let url = |s: &str| Url::parse(s).expect("valid url");

    assert!(is_auth_endpoint(&url("https://api.example/api/v1/Auth/Refresh")));
    assert!(is_auth_endpoint(&url("https://api.example/api/v1/Auth/Google")));
    assert!(is_auth_endpoint(&url("https://api.example/api/v1/auth/refresh/")));
    assert!(is_auth_endpoint(&url("https://api.example/Auth/Refresh?x=1")));

    assert!(!is_auth_endpoint(&url("https://api.example/api/v1/Auth")));
    assert!(!is_auth_endpoint(&url("https://api.example/api/v1/MyAuth/Refresh")));
    assert!(!is_auth_endpoint(&url("https://api.example/api/v1/Auth/Refresh/extra")));
    assert!(!is_auth_endpoint(&url("https://api.example/api/v1/Songs/1")));
}

#[test]
fn test_bearer_token_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
    assert_eq!(bearer_token(&headers), Some("abc"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer xyz"));
    assert_eq!(bearer_token(&headers), Some("xyz"));

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
    assert_eq!(bearer_token(&headers), None);

    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
    assert_eq!(bearer_token(&headers), None);
}
