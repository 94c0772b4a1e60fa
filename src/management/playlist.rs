use std::sync::Arc;

use crate::{
    error::Result,
    management::SongManager,
    remote::ApiClient,
    types::{CreatePlaylistRequest, Playlist, PlaylistDetails},
    utils,
};

pub struct PlaylistManager {
    client: Arc<ApiClient>,
    songs: SongManager,
}

impl PlaylistManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            songs: SongManager::new(Arc::clone(&client)),
            client,
        }
    }

    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        self.client.service().await?.my_playlists().await
    }

    /// Playlist with its songs in playlist order.
    ///
    /// Pass the previously loaded details to reuse their resolved URLs.
    pub async fn get_playlist(
        &self,
        id: &str,
        previous: Option<&PlaylistDetails>,
    ) -> Result<PlaylistDetails> {
        let playlist = self.client.service().await?.playlist(id).await?;
        let songs = self
            .songs
            .get_songs(&playlist.song_ids, previous.map(|p| p.songs.as_slice()))
            .await?;
        Ok(PlaylistDetails { playlist, songs })
    }

    pub async fn create_playlist(&self, name: &str, description: Option<&str>) -> Result<Playlist> {
        let request = CreatePlaylistRequest {
            name: name.trim().to_string(),
            description: utils::non_blank(description),
        };
        self.client.service().await?.create_playlist(&request).await
    }

    pub async fn add_song(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        self.client
            .service()
            .await?
            .add_playlist_song(playlist_id, song_id)
            .await
    }

    pub async fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        self.client
            .service()
            .await?
            .remove_playlist_song(playlist_id, song_id)
            .await
    }

    pub async fn delete_playlist(&self, id: &str) -> Result<()> {
        self.client.service().await?.delete_playlist(id).await
    }
}
