use std::sync::Arc;

use tracing::warn;

use crate::{
    enrich::{self, EnrichReport, SongAudio, SongCover},
    error::Result,
    remote::{ApiClient, MusicService},
    types::{CoverKey, CoverUrl, Song},
};

pub struct SongManager {
    client: Arc<ApiClient>,
}

impl SongManager {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn get_song(&self, id: &str) -> Result<Song> {
        let service = self.client.service().await?;
        let mut songs = vec![service.song(id).await?];
        enrich_songs(service, &mut songs, None).await;
        Ok(songs.remove(0))
    }

    /// Fetches songs one by one, then resolves their URLs in two batches.
    ///
    /// Songs that fail to load are skipped. Authentication failures abort
    /// the whole call since every following request would fail the same way.
    /// `previous` holds earlier copies whose URLs may be reused.
    pub async fn get_songs(&self, ids: &[String], previous: Option<&[Song]>) -> Result<Vec<Song>> {
        let service = self.client.service().await?;

        let mut songs = Vec::with_capacity(ids.len());
        for id in ids {
            match service.song(id).await {
                Ok(song) => songs.push(song),
                Err(e) if e.is_auth_error() => return Err(e),
                Err(e) => warn!(song_id = %id, error = %e, "skipping song"),
            }
        }

        enrich_songs(service, &mut songs, previous).await;
        Ok(songs)
    }

    /// Resolves audio and cover URLs for songs fetched elsewhere.
    pub async fn enrich(&self, songs: &mut [Song], previous: Option<&[Song]>) -> Result<()> {
        let service = self.client.service().await?;
        enrich_songs(service, songs, previous).await;
        Ok(())
    }
}

/// Audio pass then cover pass.
pub(crate) async fn enrich_songs(
    service: &MusicService,
    songs: &mut [Song],
    previous: Option<&[Song]>,
) -> (EnrichReport, EnrichReport) {
    let audio = enrich::enrich(SongAudio, songs, previous, |file_names| async move {
        service.audio_urls(&file_names).await.map(|urls| {
            urls.into_iter()
                .filter_map(|item| Some((item.file_name, item.url?)))
                .collect::<Vec<_>>()
        })
    })
    .await;

    let cover = enrich::enrich(SongCover, songs, previous, |keys| async move {
        service.cover_urls(&keys).await.map(cover_pairs)
    })
    .await;

    (audio, cover)
}

pub(crate) fn cover_pairs(urls: Vec<CoverUrl>) -> Vec<(CoverKey, String)> {
    urls.into_iter()
        .filter_map(|item| {
            let key = CoverKey {
                file_name: item.file_name,
                album_id: item.album_id,
            };
            Some((key, item.url?))
        })
        .collect()
}
