use std::sync::Arc;

use tracing::warn;

use crate::{
    enrich::{self, AlbumCover, EnrichReport},
    error::Result,
    management::song::{cover_pairs, enrich_songs},
    remote::{ApiClient, MusicService},
    types::{Album, Song},
};

pub struct AlbumManager {
    client: Arc<ApiClient>,
}

impl AlbumManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_album(&self, id: &str) -> Result<Album> {
        let service = self.client.service().await?;
        let mut albums = vec![service.album(id).await?];
        enrich_albums(service, &mut albums, None).await;
        Ok(albums.remove(0))
    }

    /// Same contract as [`crate::management::SongManager::get_songs`].
    pub async fn get_albums(
        &self,
        ids: &[String],
        previous: Option<&[Album]>,
    ) -> Result<Vec<Album>> {
        let service = self.client.service().await?;

        let mut albums = Vec::with_capacity(ids.len());
        for id in ids {
            match service.album(id).await {
                Ok(album) => albums.push(album),
                Err(e) if e.is_auth_error() => return Err(e),
                Err(e) => warn!(album_id = %id, error = %e, "skipping album"),
            }
        }

        enrich_albums(service, &mut albums, previous).await;
        Ok(albums)
    }

    pub async fn get_album_songs(&self, id: &str) -> Result<Vec<Song>> {
        let service = self.client.service().await?;
        let mut songs = service.album_songs(id).await?;
        enrich_songs(service, &mut songs, None).await;
        Ok(songs)
    }
}

pub(crate) async fn enrich_albums(
    service: &MusicService,
    albums: &mut [Album],
    previous: Option<&[Album]>,
) -> EnrichReport {
    enrich::enrich(AlbumCover, albums, previous, |keys| async move {
        service.cover_urls(&keys).await.map(cover_pairs)
    })
    .await
}
