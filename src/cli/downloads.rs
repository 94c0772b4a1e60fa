use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::fail,
    info,
    management::DownloadManager,
    remote::ApiClient,
    success,
    types::DownloadTableRow,
    utils, warning,
};

pub async fn list_downloads(client: Arc<ApiClient>) {
    let downloads = match DownloadManager::new(client).list_downloads().await {
        Ok(downloads) => downloads,
        Err(e) => fail("Failed to read download index", e),
    };

    if downloads.is_empty() {
        info!("No downloaded songs.");
        return;
    }

    let rows: Vec<DownloadTableRow> = downloads
        .into_iter()
        .map(|d| DownloadTableRow {
            id: d.song.id,
            title: d.song.title,
            artist: d.song.artist_name.unwrap_or_default(),
            size: utils::format_size(d.size_bytes),
            downloaded: d.downloaded_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn add_download(client: Arc<ApiClient>, song_ids: Vec<String>) {
    let manager = DownloadManager::new(client);
    let pb = utils::spinner("Downloading...");

    let mut done = 0;
    for id in &song_ids {
        pb.set_message(format!("Downloading song {}...", id));
        match manager.download(id).await {
            Ok(entry) => {
                done += 1;
                pb.println(format!("{} -> {}", entry.song.title, entry.file_path));
            }
            Err(e) if e.is_auth_error() => {
                pb.finish_and_clear();
                fail("Download failed", e);
            }
            Err(e) => pb.println(format!("Song {} skipped: {}", id, e)),
        }
    }

    pb.finish_and_clear();
    if done == song_ids.len() {
        success!("Downloaded {} songs to {}", done, manager.dir().display());
    } else {
        warning!("Downloaded {} of {} songs.", done, song_ids.len());
    }
}

pub async fn remove_download(client: Arc<ApiClient>, song_id: String) {
    match DownloadManager::new(client).remove_download(&song_id).await {
        Ok(true) => success!("Removed download of song {}.", song_id),
        Ok(false) => info!("Song {} is not downloaded.", song_id),
        Err(e) => fail("Failed to remove download", e),
    }
}
