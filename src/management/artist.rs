use std::sync::Arc;

use crate::{
    enrich::{self, ArtistAvatar, EnrichReport},
    error::Result,
    management::{album::enrich_albums, song::enrich_songs},
    remote::{ApiClient, MusicService},
    types::{Album, Artist, Song},
};

pub struct ArtistManager {
    client: Arc<ApiClient>,
}

impl ArtistManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_artist(&self, id: &str) -> Result<Artist> {
        let service = self.client.service().await?;
        let mut artists = vec![service.artist(id).await?];
        enrich_artists(service, &mut artists, None).await;
        Ok(artists.remove(0))
    }

    pub async fn get_artist_songs(&self, id: &str) -> Result<Vec<Song>> {
        let service = self.client.service().await?;
        let mut songs = service.artist_songs(id).await?;
        enrich_songs(service, &mut songs, None).await;
        Ok(songs)
    }

    pub async fn get_artist_albums(&self, id: &str) -> Result<Vec<Album>> {
        let service = self.client.service().await?;
        let mut albums = service.artist_albums(id).await?;
        enrich_albums(service, &mut albums, None).await;
        Ok(albums)
    }
}

pub(crate) async fn enrich_artists(
    service: &MusicService,
    artists: &mut [Artist],
    previous: Option<&[Artist]>,
) -> EnrichReport {
    enrich::enrich(ArtistAvatar, artists, previous, |file_names| async move {
        service.avatar_urls(&file_names).await.map(|urls| {
            urls.into_iter()
                .filter_map(|item| Some((item.file_name, item.url?)))
                .collect::<Vec<_>>()
        })
    })
    .await
}
