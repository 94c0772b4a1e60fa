use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{ApiError, Result, StoreError},
    management::SongManager,
    remote::ApiClient,
    types::DownloadedSong,
    utils,
};

const INDEX_FILE: &str = "downloads.json";

/// Local cache of downloaded songs.
///
/// Audio files live next to a `downloads.json` index. The index stores song
/// metadata only; presigned URLs are stripped before writing.
pub struct DownloadManager {
    client: Arc<ApiClient>,
    songs: SongManager,
    dir: PathBuf,
    index_lock: Mutex<()>,
}

impl DownloadManager {
    /// Uses the download directory from the client's configuration.
    pub fn new(client: Arc<ApiClient>) -> Self {
        let dir = client.config().download_dir.clone();
        Self::with_dir(client, dir)
    }

    pub fn with_dir(client: Arc<ApiClient>, dir: impl Into<PathBuf>) -> Self {
        Self {
            songs: SongManager::new(Arc::clone(&client)),
            client,
            dir: dir.into(),
            index_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Downloads a song unless a complete copy is already on disk.
    pub async fn download(&self, song_id: &str) -> Result<DownloadedSong> {
        if let Some(existing) = self.get_download(song_id).await? {
            if file_exists(&existing.file_path).await {
                debug!(song_id, "already downloaded");
                return Ok(existing);
            }
        }

        let song = self.songs.get_song(song_id).await?;
        let url = utils::non_blank(song.audio_url.as_deref())
            .ok_or_else(|| ApiError::NoPlayableUrl(song_id.to_string()))?;

        let bytes = self.client.service().await?.download(&url).await?;

        let extension = utils::file_extension(song.file_name.as_deref().unwrap_or_default());
        let path = self
            .dir
            .join(format!("{}.{}", sanitize_file_stem(&song.id), extension));

        async_fs::create_dir_all(&self.dir)
            .await
            .map_err(StoreError::from)?;
        async_fs::write(&path, &bytes)
            .await
            .map_err(StoreError::from)?;

        let entry = DownloadedSong {
            song: song.without_urls(),
            file_path: path.to_string_lossy().into_owned(),
            size_bytes: bytes.len() as u64,
            downloaded_at: Utc::now(),
        };

        let _guard = self.index_lock.lock().await;
        let mut index = self.load_index().await?;
        index.retain(|d| d.song.id != entry.song.id);
        index.push(entry.clone());
        self.persist_index(&index).await?;

        Ok(entry)
    }

    /// Downloads sorted by title.
    pub async fn list_downloads(&self) -> Result<Vec<DownloadedSong>> {
        let mut index = self.load_index().await?;
        index.sort_by(|a, b| a.song.title.to_lowercase().cmp(&b.song.title.to_lowercase()));
        Ok(index)
    }

    pub async fn get_download(&self, song_id: &str) -> Result<Option<DownloadedSong>> {
        Ok(self
            .load_index()
            .await?
            .into_iter()
            .find(|d| d.song.id == song_id))
    }

    /// Indexed and the file still exists.
    pub async fn is_downloaded(&self, song_id: &str) -> Result<bool> {
        Ok(match self.get_download(song_id).await? {
            Some(entry) => file_exists(&entry.file_path).await,
            None => false,
        })
    }

    /// Deletes the file and the index entry. Returns `false` when the song
    /// was not downloaded.
    pub async fn remove_download(&self, song_id: &str) -> Result<bool> {
        let _guard = self.index_lock.lock().await;
        let mut index = self.load_index().await?;
        let Some(position) = index.iter().position(|d| d.song.id == song_id) else {
            return Ok(false);
        };

        let entry = index.remove(position);
        match async_fs::remove_file(&entry.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(song_id, path = %entry.file_path, "downloaded file already gone")
            }
            Err(e) => return Err(StoreError::from(e).into()),
        }

        self.persist_index(&index).await?;
        Ok(true)
    }

    async fn load_index(&self) -> std::result::Result<Vec<DownloadedSong>, StoreError> {
        match async_fs::read_to_string(self.dir.join(INDEX_FILE)).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist_index(
        &self,
        index: &[DownloadedSong],
    ) -> std::result::Result<(), StoreError> {
        async_fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(index)?;
        async_fs::write(self.dir.join(INDEX_FILE), json).await?;
        Ok(())
    }
}

async fn file_exists(path: &str) -> bool {
    async_fs::metadata(path).await.is_ok()
}

fn sanitize_file_stem(id: &str) -> String {
    let stem: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "song".to_string()
    } else {
        stem
    }
}
