use std::sync::Arc;

use chrono::DateTime;

use crate::{cli::fail, info, remote::ApiClient, success, warning};

pub async fn login(client: Arc<ApiClient>, id_token: String) {
    if id_token.trim().is_empty() {
        warning!("The Google ID token is empty.");
        return;
    }

    match client.session().login_with_google(id_token.trim()).await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => fail("Login failed", e),
    }
}

pub async fn logout(client: Arc<ApiClient>) {
    if !client.session().is_authenticated() {
        info!("Not logged in.");
        return;
    }

    client.session().clear_tokens().await;
    success!("Logged out.");
}

pub async fn status(client: Arc<ApiClient>) {
    let Some(credential) = client.session().credential() else {
        warning!("Not logged in. Run harmonia auth login.");
        return;
    };

    match credential
        .access_expiry
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
    {
        Some(expiry) if credential.expires_within(0) => {
            info!("Logged in, access token expired at {} (refreshed on next request)", expiry)
        }
        Some(expiry) => info!("Logged in, access token valid until {}", expiry),
        None => info!("Logged in, access token expiry unknown"),
    }
}
