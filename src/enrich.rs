//! Batch resolution of presigned media URLs.
//!
//! Entities carry a storage key (a file name, or a file name scoped by album)
//! and an optional resolved URL. [`enrich`] fills in missing URLs for a whole
//! slice with a single batched request:
//!
//! 1. entities that already have a URL are left alone
//! 2. entities whose previous version (same ID, same key) had a URL get it
//!    back without asking the server
//! 3. the remaining non-blank keys are deduplicated and sent in one call
//! 4. the response is indexed by key and merged back
//!
//! Entities without a match stay without URL. A failed batch call is logged
//! and leaves every pending entity without URL; it never fails the caller.

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    future::Future,
    hash::Hash,
};

use tracing::{debug, warn};

use crate::{
    error::ApiError,
    types::{Album, Artist, CoverKey, Song},
    utils,
};

/// One URL-bearing field of an entity type.
pub trait UrlField<E> {
    type Key: Clone + Eq + Hash + Debug;

    /// Short label for logs.
    const NAME: &'static str;

    fn id(entity: &E) -> &str;

    /// Batch key, `None` when any component is blank.
    fn key(entity: &E) -> Option<Self::Key>;

    fn url(entity: &E) -> Option<&str>;

    fn set_url(entity: &mut E, url: String);
}

/// Counters for a single enrichment pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichReport {
    /// URLs copied from the previous versions.
    pub reused: usize,
    /// Distinct keys sent in the batch call.
    pub requested: usize,
    /// Entities that received a URL from the batch call.
    pub resolved: usize,
    /// Entities left out because of a blank key.
    pub skipped_blank: usize,
    /// The batch call failed.
    pub failed: bool,
}

pub struct SongAudio;
pub struct SongCover;
pub struct AlbumCover;
pub struct ArtistAvatar;

impl UrlField<Song> for SongAudio {
    type Key = String;
    const NAME: &'static str = "song audio";

    fn id(song: &Song) -> &str {
        &song.id
    }

    fn key(song: &Song) -> Option<String> {
        utils::non_blank(song.file_name.as_deref())
    }

    fn url(song: &Song) -> Option<&str> {
        song.audio_url.as_deref()
    }

    fn set_url(song: &mut Song, url: String) {
        song.audio_url = Some(url);
    }
}

impl UrlField<Song> for SongCover {
    type Key = CoverKey;
    const NAME: &'static str = "song cover";

    fn id(song: &Song) -> &str {
        &song.id
    }

    fn key(song: &Song) -> Option<CoverKey> {
        Some(CoverKey {
            file_name: utils::non_blank(song.cover_file_name.as_deref())?,
            album_id: utils::non_blank(song.album_id.as_deref())?,
        })
    }

    fn url(song: &Song) -> Option<&str> {
        song.cover_url.as_deref()
    }

    fn set_url(song: &mut Song, url: String) {
        song.cover_url = Some(url);
    }
}

impl UrlField<Album> for AlbumCover {
    type Key = CoverKey;
    const NAME: &'static str = "album cover";

    fn id(album: &Album) -> &str {
        &album.id
    }

    fn key(album: &Album) -> Option<CoverKey> {
        Some(CoverKey {
            file_name: utils::non_blank(album.cover_file_name.as_deref())?,
            album_id: utils::non_blank(Some(&album.id))?,
        })
    }

    fn url(album: &Album) -> Option<&str> {
        album.cover_url.as_deref()
    }

    fn set_url(album: &mut Album, url: String) {
        album.cover_url = Some(url);
    }
}

impl UrlField<Artist> for ArtistAvatar {
    type Key = String;
    const NAME: &'static str = "artist avatar";

    fn id(artist: &Artist) -> &str {
        &artist.id
    }

    fn key(artist: &Artist) -> Option<String> {
        utils::non_blank(artist.avatar_file_name.as_deref())
    }

    fn url(artist: &Artist) -> Option<&str> {
        artist.avatar_url.as_deref()
    }

    fn set_url(artist: &mut Artist, url: String) {
        artist.avatar_url = Some(url);
    }
}

/// Fills in the `F` URL of every entity in `entities`.
///
/// `resolve` is called at most once, with the distinct pending keys in
/// first-seen order, and returns `(key, url)` pairs. Pairs with a blank URL
/// are ignored.
pub async fn enrich<E, F, R, Fut>(
    _field: F,
    entities: &mut [E],
    previous: Option<&[E]>,
    resolve: R,
) -> EnrichReport
where
    F: UrlField<E>,
    R: FnOnce(Vec<F::Key>) -> Fut,
    Fut: Future<Output = Result<Vec<(F::Key, String)>, ApiError>>,
{
    let mut report = EnrichReport::default();

    let previous_urls: HashMap<&str, (Option<F::Key>, &str)> = previous
        .unwrap_or_default()
        .iter()
        .filter_map(|e| F::url(e).map(|url| (F::id(e), (F::key(e), url))))
        .filter(|(_, (_, url))| !url.trim().is_empty())
        .collect();

    let mut pending: Vec<(usize, F::Key)> = Vec::new();
    let mut keys: Vec<F::Key> = Vec::new();
    let mut seen: HashSet<F::Key> = HashSet::new();

    for (index, entity) in entities.iter_mut().enumerate() {
        if !utils::is_blank(F::url(entity)) {
            continue;
        }

        let key = F::key(entity);

        if let Some((previous_key, url)) = previous_urls.get(F::id(entity)) {
            if *previous_key == key {
                F::set_url(entity, url.to_string());
                report.reused += 1;
                continue;
            }
        }

        let Some(key) = key else {
            report.skipped_blank += 1;
            continue;
        };

        if seen.insert(key.clone()) {
            keys.push(key.clone());
        }
        pending.push((index, key));
    }

    if keys.is_empty() {
        debug!(field = F::NAME, ?report, "nothing to resolve");
        return report;
    }

    report.requested = keys.len();
    let resolved: HashMap<F::Key, String> = match resolve(keys).await {
        Ok(pairs) => pairs
            .into_iter()
            .filter(|(_, url)| !url.trim().is_empty())
            .collect(),
        Err(e) => {
            warn!(field = F::NAME, error = %e, "batch URL resolution failed");
            report.failed = true;
            return report;
        }
    };

    for (index, key) in pending {
        if let Some(url) = resolved.get(&key) {
            F::set_url(&mut entities[index], url.clone());
            report.resolved += 1;
        }
    }

    debug!(field = F::NAME, ?report, "batch URL resolution done");
    report
}
