use std::sync::Arc;

use crate::{
    error::Result,
    management::song::enrich_songs,
    remote::ApiClient,
    types::{Genre, Song},
};

pub struct GenreManager {
    client: Arc<ApiClient>,
}

impl GenreManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Genres sorted by name.
    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let mut genres = self.client.service().await?.genres().await?;
        genres.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(genres)
    }

    pub async fn get_genre_songs(&self, id: &str) -> Result<Vec<Song>> {
        let service = self.client.service().await?;
        let mut songs = service.genre_songs(id).await?;
        enrich_songs(service, &mut songs, None).await;
        Ok(songs)
    }
}
