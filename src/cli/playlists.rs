use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{fail, print_songs},
    info,
    management::PlaylistManager,
    remote::ApiClient,
    success,
    types::PlaylistTableRow,
    utils,
};

pub async fn list_playlists(client: Arc<ApiClient>) {
    let pb = utils::spinner("Fetching playlists...");
    let playlists = PlaylistManager::new(client).list_playlists().await;
    pb.finish_and_clear();

    let mut playlists = match playlists {
        Ok(playlists) => playlists,
        Err(e) => fail("Failed to fetch playlists", e),
    };

    if playlists.is_empty() {
        info!("No playlists yet. Create one with harmonia playlists create.");
        return;
    }

    playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: p.name,
            songs: p.song_ids.len(),
            description: p.description.unwrap_or_default(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn show_playlist(client: Arc<ApiClient>, id: String) {
    let pb = utils::spinner("Fetching playlist...");
    let details = PlaylistManager::new(client).get_playlist(&id, None).await;
    pb.finish_and_clear();

    match details {
        Ok(details) => {
            info!(
                "{} ({} songs)",
                details.playlist.name,
                details.playlist.song_ids.len()
            );
            print_songs(&details.songs);
        }
        Err(e) => fail("Failed to fetch playlist", e),
    }
}

pub async fn create_playlist(client: Arc<ApiClient>, name: String, description: Option<String>) {
    if name.trim().is_empty() {
        crate::error!("Playlist name must not be empty.");
    }

    match PlaylistManager::new(client)
        .create_playlist(&name, description.as_deref())
        .await
    {
        Ok(playlist) => success!("Created playlist {} ({}).", playlist.name, playlist.id),
        Err(e) => fail("Failed to create playlist", e),
    }
}

pub async fn add_playlist_song(client: Arc<ApiClient>, playlist_id: String, song_id: String) {
    match PlaylistManager::new(client)
        .add_song(&playlist_id, &song_id)
        .await
    {
        Ok(()) => success!("Added song {} to playlist {}.", song_id, playlist_id),
        Err(e) => fail("Failed to add song", e),
    }
}

pub async fn remove_playlist_song(client: Arc<ApiClient>, playlist_id: String, song_id: String) {
    match PlaylistManager::new(client)
        .remove_song(&playlist_id, &song_id)
        .await
    {
        Ok(()) => success!("Removed song {} from playlist {}.", song_id, playlist_id),
        Err(e) => fail("Failed to remove song", e),
    }
}

pub async fn delete_playlist(client: Arc<ApiClient>, id: String) {
    match PlaylistManager::new(client).delete_playlist(&id).await {
        Ok(()) => success!("Deleted playlist {}.", id),
        Err(e) => fail("Failed to delete playlist", e),
    }
}
