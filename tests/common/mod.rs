//! Shared helpers for the integration tests.
//!
//! Every test starts its own wiremock server; the client under test points
//! at `<server>/api/v1` with retries disabled unless a test opts in.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use harmonia::{
    config::Config,
    management::{MemoryCredentialStore, SessionManager},
    remote::{ApiClient, AuthApi},
    types::{Credential, Song},
};
use serde_json::json;
use wiremock::MockServer;

pub const API_PREFIX: &str = "/api/v1";
pub const CLIENT_NAME: &str = "harmonia-test";

/// Request path under the versioned API prefix.
pub fn api_path(path: &str) -> String {
    format!("{}/{}", API_PREFIX, path)
}

pub fn test_config(server: &MockServer) -> Config {
    Config::new(&format!("{}{}", server.uri(), API_PREFIX))
        .expect("mock server URL is valid")
        .with_client_name(CLIENT_NAME)
        .with_refresh_timeout(Duration::from_secs(5))
        .with_retries(0, Duration::from_millis(1))
}

pub fn credential(access: &str, refresh: &str) -> Credential {
    Credential {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        access_expiry: None,
    }
}

pub fn store_with(credential: Option<Credential>) -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::new(credential))
}

pub fn session_with(
    config: &Config,
    store: Arc<MemoryCredentialStore>,
) -> Arc<SessionManager> {
    let auth = AuthApi::new(config).expect("auth client builds");
    let initial = store.snapshot();
    Arc::new(SessionManager::new(store, auth, initial))
}

pub async fn client_with(config: Config, store: Arc<MemoryCredentialStore>) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::connect(config, store)
            .await
            .expect("client connects"),
    )
}

/// Unsigned JWT carrying only an `exp` claim.
pub fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": "user-1", "exp": exp }).to_string());
    format!("{header}.{payload}.sig")
}

pub fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({ "accessToken": access, "refreshToken": refresh })
}

pub fn song(id: &str, file_name: Option<&str>) -> Song {
    Song {
        id: id.to_string(),
        title: format!("Song {id}"),
        file_name: file_name.map(str::to_string),
        ..Song::default()
    }
}

pub fn song_json(id: &str, file_name: Option<&str>, cover: Option<(&str, &str)>) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Song {id}"),
        "artistName": "Artist",
        "albumId": cover.map(|(_, album)| album),
        "durationSeconds": 215,
        "fileName": file_name,
        "coverFileName": cover.map(|(file, _)| file),
    })
}
