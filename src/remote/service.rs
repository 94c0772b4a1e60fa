use std::sync::Arc;

use reqwest::Method;

use crate::{
    config::Config,
    error::Result,
    management::SessionManager,
    remote::{AuthInterceptor, TokenAuthenticator, client::Transport},
    types::{
        Album, Artist, CoverKey, CoverUrl, CreatePlaylistRequest, FileNamesRequest, FileUrl, Genre,
        Playlist, Song,
    },
};

/// Typed proxy over the REST endpoints.
///
/// Obtain it through [`crate::remote::ApiClient::service`]; every call goes
/// through the authenticated transport.
pub struct MusicService {
    transport: Transport,
}

impl MusicService {
    pub(crate) fn build(config: &Config, session: Arc<SessionManager>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config, session)?,
        })
    }

    pub fn interceptor(&self) -> &Arc<AuthInterceptor> {
        &self.transport.interceptor
    }

    pub fn authenticator(&self) -> &Arc<TokenAuthenticator> {
        &self.transport.authenticator
    }

    // Songs and media URLs

    pub async fn song(&self, id: &str) -> Result<Song> {
        self.transport.get_json(&["Songs", id]).await
    }

    pub async fn audio_urls(&self, file_names: &[String]) -> Result<Vec<FileUrl>> {
        let body = FileNamesRequest {
            file_names: file_names.to_vec(),
        };
        self.transport.post_json(&["Songs", "audio-urls"], &body).await
    }

    pub async fn cover_urls(&self, keys: &[CoverKey]) -> Result<Vec<CoverUrl>> {
        self.transport.post_json(&["Covers", "urls"], keys).await
    }

    pub async fn avatar_urls(&self, file_names: &[String]) -> Result<Vec<FileUrl>> {
        let body = FileNamesRequest {
            file_names: file_names.to_vec(),
        };
        self.transport.post_json(&["Artists", "avatar-urls"], &body).await
    }

    /// Fetches a presigned object.
    pub async fn download(&self, presigned_url: &str) -> Result<Vec<u8>> {
        self.transport.fetch_presigned(presigned_url).await
    }

    // Albums

    pub async fn album(&self, id: &str) -> Result<Album> {
        self.transport.get_json(&["Albums", id]).await
    }

    pub async fn album_songs(&self, id: &str) -> Result<Vec<Song>> {
        self.transport.get_json(&["Albums", id, "songs"]).await
    }

    // Artists

    pub async fn artist(&self, id: &str) -> Result<Artist> {
        self.transport.get_json(&["Artists", id]).await
    }

    pub async fn artist_songs(&self, id: &str) -> Result<Vec<Song>> {
        self.transport.get_json(&["Artists", id, "songs"]).await
    }

    pub async fn artist_albums(&self, id: &str) -> Result<Vec<Album>> {
        self.transport.get_json(&["Artists", id, "albums"]).await
    }

    // Playlists

    pub async fn my_playlists(&self) -> Result<Vec<Playlist>> {
        self.transport.get_json(&["Playlists", "me"]).await
    }

    pub async fn playlist(&self, id: &str) -> Result<Playlist> {
        self.transport.get_json(&["Playlists", id]).await
    }

    pub async fn create_playlist(&self, request: &CreatePlaylistRequest) -> Result<Playlist> {
        self.transport.post_json(&["Playlists"], request).await
    }

    pub async fn add_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        self.transport
            .send_empty(Method::POST, &["Playlists", playlist_id, "songs", song_id])
            .await
    }

    pub async fn remove_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        self.transport
            .send_empty(Method::DELETE, &["Playlists", playlist_id, "songs", song_id])
            .await
    }

    pub async fn delete_playlist(&self, id: &str) -> Result<()> {
        self.transport
            .send_empty(Method::DELETE, &["Playlists", id])
            .await
    }

    // Genres

    pub async fn genres(&self) -> Result<Vec<Genre>> {
        self.transport.get_json(&["Genres"]).await
    }

    pub async fn genre_songs(&self, id: &str) -> Result<Vec<Song>> {
        self.transport.get_json(&["Genres", id, "songs"]).await
    }

    // Favorites

    pub async fn favorite_songs(&self) -> Result<Vec<Song>> {
        self.transport.get_json(&["Favorites", "songs"]).await
    }

    pub async fn add_favorite(&self, song_id: &str) -> Result<()> {
        self.transport
            .send_empty(Method::POST, &["Favorites", "songs", song_id])
            .await
    }

    pub async fn remove_favorite(&self, song_id: &str) -> Result<()> {
        self.transport
            .send_empty(Method::DELETE, &["Favorites", "songs", song_id])
            .await
    }
}
