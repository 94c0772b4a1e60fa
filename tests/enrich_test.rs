mod common;

use std::time::Duration;

use common::*;
use harmonia::{
    enrich::{self, SongAudio, SongCover},
    error::ApiError,
    types::{CoverKey, Song},
};

type Pairs = Vec<(String, String)>;

fn urls(songs: &[Song]) -> Vec<Option<&str>> {
    songs.iter().map(|s| s.audio_url.as_deref()).collect()
}

fn covered(id: &str, cover: Option<&str>, album: Option<&str>) -> Song {
    Song {
        cover_file_name: cover.map(str::to_string),
        album_id: album.map(str::to_string),
        ..song(id, None)
    }
}

#[tokio::test]
async fn test_blank_file_names_are_not_requested() {
    let mut songs = vec![
        song("1", Some("a.mp3")),
        song("2", Some("b.mp3")),
        song("3", Some("")),
        song("4", Some("   ")),
        song("5", None),
    ];

    let mut requested = Vec::new();
    let report = enrich::enrich(SongAudio, &mut songs, None, |keys| {
        requested = keys;
        async { Ok::<Pairs, ApiError>(vec![("a.mp3".to_string(), "urlA".to_string())]) }
    })
    .await;

    assert_eq!(requested, vec!["a.mp3".to_string(), "b.mp3".to_string()]);
    assert_eq!(urls(&songs), vec![Some("urlA"), None, None, None, None]);
    assert_eq!(report.requested, 2);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.skipped_blank, 3);
    assert!(!report.failed);
}

#[tokio::test]
async fn test_duplicate_keys_are_requested_once() {
    let mut songs = vec![
        song("1", Some("same.mp3")),
        song("2", Some("other.mp3")),
        song("3", Some("same.mp3")),
    ];

    let mut requested = Vec::new();
    enrich::enrich(SongAudio, &mut songs, None, |keys| {
        requested = keys;
        async {
            Ok::<Pairs, ApiError>(vec![
                ("other.mp3".to_string(), "urlO".to_string()),
                ("same.mp3".to_string(), "urlS".to_string()),
            ])
        }
    })
    .await;

    assert_eq!(requested, vec!["same.mp3".to_string(), "other.mp3".to_string()]);
    assert_eq!(urls(&songs), vec![Some("urlS"), Some("urlO"), Some("urlS")]);
}

#[tokio::test]
async fn test_previous_urls_are_reused() {
    let mut previous = vec![song("1", Some("a.mp3")), song("2", Some("b.mp3"))];
    previous[0].audio_url = Some("cachedA".to_string());
    previous[1].audio_url = Some("cachedB".to_string());

    // Song 2 now points at a different object, so its old URL is stale.
    let mut songs = vec![song("1", Some("a.mp3")), song("2", Some("b2.mp3"))];

    let mut requested = Vec::new();
    let report = enrich::enrich(SongAudio, &mut songs, Some(&previous), |keys| {
        requested = keys;
        async { Ok::<Pairs, ApiError>(vec![("b2.mp3".to_string(), "freshB".to_string())]) }
    })
    .await;

    assert_eq!(requested, vec!["b2.mp3".to_string()]);
    assert_eq!(urls(&songs), vec![Some("cachedA"), Some("freshB")]);
    assert_eq!(report.reused, 1);
    assert_eq!(report.resolved, 1);
}

#[tokio::test]
async fn test_nothing_pending_skips_the_call() {
    let mut previous = vec![song("1", Some("a.mp3"))];
    previous[0].audio_url = Some("cachedA".to_string());

    let mut already = song("2", Some("b.mp3"));
    already.audio_url = Some("presentB".to_string());
    let mut songs = vec![song("1", Some("a.mp3")), already, song("3", None)];

    let mut called = false;
    let report = enrich::enrich(SongAudio, &mut songs, Some(&previous), |_| {
        called = true;
        async { Ok::<Pairs, ApiError>(Vec::new()) }
    })
    .await;

    assert!(!called);
    assert_eq!(report.requested, 0);
    assert_eq!(urls(&songs), vec![Some("cachedA"), Some("presentB"), None]);
}

#[tokio::test]
async fn test_failed_batch_leaves_urls_empty() {
    let mut songs = vec![song("1", Some("a.mp3")), song("2", Some("b.mp3"))];

    let report = enrich::enrich(SongAudio, &mut songs, None, |_| async {
        Err::<Pairs, ApiError>(ApiError::Timeout(Duration::from_secs(30)))
    })
    .await;

    assert!(report.failed);
    assert_eq!(report.resolved, 0);
    assert_eq!(urls(&songs), vec![None, None]);
}

#[tokio::test]
async fn test_blank_urls_in_response_are_ignored() {
    let mut songs = vec![song("1", Some("a.mp3"))];

    enrich::enrich(SongAudio, &mut songs, None, |_| async {
        Ok::<Pairs, ApiError>(vec![("a.mp3".to_string(), "  ".to_string())])
    })
    .await;

    assert_eq!(urls(&songs), vec![None]);
}

#[tokio::test]
async fn test_cover_key_is_scoped_by_album() {
    let mut songs = vec![
        covered("1", Some("cover.jpg"), Some("album-1")),
        covered("2", Some("cover.jpg"), Some("album-2")),
        covered("3", Some("cover.jpg"), Some("")),
        covered("4", None, Some("album-1")),
        covered("5", Some("cover.jpg"), Some("album-1")),
    ];

    let mut requested = Vec::new();
    let report = enrich::enrich(SongCover, &mut songs, None, |keys: Vec<CoverKey>| {
        requested = keys.clone();
        async move {
            Ok::<Vec<(CoverKey, String)>, ApiError>(
                keys.into_iter()
                    .map(|k| {
                        let url = format!("{}/{}", k.album_id, k.file_name);
                        (k, url)
                    })
                    .collect(),
            )
        }
    })
    .await;

    let key = |file: &str, album: &str| CoverKey {
        file_name: file.to_string(),
        album_id: album.to_string(),
    };
    assert_eq!(
        requested,
        vec![key("cover.jpg", "album-1"), key("cover.jpg", "album-2")]
    );

    let covers: Vec<_> = songs.iter().map(|s| s.cover_url.as_deref()).collect();
    assert_eq!(
        covers,
        vec![
            Some("album-1/cover.jpg"),
            Some("album-2/cover.jpg"),
            None,
            None,
            Some("album-1/cover.jpg"),
        ]
    );
    assert_eq!(report.skipped_blank, 2);
}
