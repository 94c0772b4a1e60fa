use std::sync::Arc;

use crate::{
    error::Result, management::song::enrich_songs, remote::ApiClient, types::Song,
};

pub struct FavoriteManager {
    client: Arc<ApiClient>,
}

impl FavoriteManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Favorite songs with URLs resolved. URLs already present in `previous`
    /// are reused.
    pub async fn list_favorites(&self, previous: Option<&[Song]>) -> Result<Vec<Song>> {
        let service = self.client.service().await?;
        let mut songs = service.favorite_songs().await?;
        enrich_songs(service, &mut songs, previous).await;
        Ok(songs)
    }

    /// Checks membership without resolving any URL.
    pub async fn is_favorite(&self, song_id: &str) -> Result<bool> {
        let songs = self.client.service().await?.favorite_songs().await?;
        Ok(songs.iter().any(|s| s.id == song_id))
    }

    pub async fn add_favorite(&self, song_id: &str) -> Result<()> {
        self.client.service().await?.add_favorite(song_id).await
    }

    pub async fn remove_favorite(&self, song_id: &str) -> Result<()> {
        self.client.service().await?.remove_favorite(song_id).await
    }
}
