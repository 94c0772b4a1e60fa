use std::sync::Arc;

use crate::{info, management::DownloadManager, remote::ApiClient, utils, warning};

/// Prints where harmonia talks to, where it stores things and the session
/// state.
pub async fn info(client: Arc<ApiClient>) {
    let config = client.config();
    info!("API: {}", config.api_url);
    info!("Client name: {}", config.client_name);
    info!("Download directory: {}", config.download_dir.display());

    match client.session().credential() {
        Some(credential) if credential.expires_within(0) => {
            info!("Session: logged in (access token expired, will refresh)")
        }
        Some(_) => info!("Session: logged in"),
        None => warning!("Session: not logged in"),
    }

    match DownloadManager::new(client).list_downloads().await {
        Ok(downloads) => {
            let total: u64 = downloads.iter().map(|d| d.size_bytes).sum();
            info!(
                "Downloads: {} songs, {}",
                downloads.len(),
                utils::format_size(total)
            );
        }
        Err(e) => warning!("Downloads: index unreadable ({})", e),
    }
}
