mod common;

use common::*;
use harmonia::{
    error::ApiError,
    management::{
        AlbumManager, ArtistManager, FavoriteManager, GenreManager, PlaylistManager, SongManager,
    },
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api_path(route)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_songs_are_enriched_in_two_batches() {
    let server = MockServer::start().await;
    mount_get(&server, "Songs/1", song_json("1", Some("a.mp3"), Some(("c.jpg", "al-1")))).await;
    mount_get(&server, "Songs/2", song_json("2", Some("b.mp3"), Some(("c.jpg", "al-2")))).await;
    mount_get(&server, "Songs/3", song_json("3", Some(" "), None)).await;

    Mock::given(method("POST"))
        .and(path(api_path("Songs/audio-urls")))
        .and(body_json(json!({ "fileNames": ["a.mp3", "b.mp3"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fileName": "a.mp3", "url": "https://cdn/a" },
            { "fileName": "b.mp3", "url": null },
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("Covers/urls")))
        .and(body_json(json!([
            { "fileName": "c.jpg", "albumId": "al-1" },
            { "fileName": "c.jpg", "albumId": "al-2" },
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fileName": "c.jpg", "albumId": "al-2", "url": "https://cdn/c2" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
    let songs = SongManager::new(client)
        .get_songs(&ids, None)
        .await
        .expect("songs load");

    let audio: Vec<_> = songs.iter().map(|s| s.audio_url.as_deref()).collect();
    let covers: Vec<_> = songs.iter().map(|s| s.cover_url.as_deref()).collect();
    assert_eq!(audio, vec![Some("https://cdn/a"), None, None]);
    assert_eq!(covers, vec![None, Some("https://cdn/c2"), None]);
}

#[tokio::test]
async fn test_missing_songs_are_skipped() {
    let server = MockServer::start().await;
    mount_get(&server, "Songs/1", song_json("1", None, None)).await;
    mount_get(&server, "Songs/3", song_json("3", None, None)).await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();
    let songs = SongManager::new(client)
        .get_songs(&ids, None)
        .await
        .expect("partial result");

    let loaded: Vec<_> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(loaded, vec!["1", "3"]);
}

#[tokio::test]
async fn test_auth_failure_aborts_song_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("Songs/1")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let ids = vec!["1".to_string(), "2".to_string()];
    let err = SongManager::new(client)
        .get_songs(&ids, None)
        .await
        .expect_err("not logged in");

    assert!(matches!(err, ApiError::NotAuthenticated), "got {err:?}");
}

#[tokio::test]
async fn test_failed_url_batch_keeps_songs() {
    let server = MockServer::start().await;
    mount_get(&server, "Albums/al-1/songs", json!([
        song_json("1", Some("a.mp3"), None),
        song_json("2", Some("b.mp3"), None),
    ]))
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("Songs/audio-urls")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let songs = AlbumManager::new(client)
        .get_album_songs("al-1")
        .await
        .expect("songs survive a failed batch");

    assert_eq!(songs.len(), 2);
    assert!(songs.iter().all(|s| s.audio_url.is_none()));
}

#[tokio::test]
async fn test_album_cover_uses_album_id() {
    let server = MockServer::start().await;
    mount_get(&server, "Albums/al-9", json!({
        "id": "al-9",
        "title": "Night Drive",
        "releaseYear": 2021,
        "coverFileName": "front.jpg",
    }))
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("Covers/urls")))
        .and(body_json(json!([{ "fileName": "front.jpg", "albumId": "al-9" }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fileName": "front.jpg", "albumId": "al-9", "url": "https://cdn/front" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let album = AlbumManager::new(client)
        .get_album("al-9")
        .await
        .expect("album loads");

    assert_eq!(album.cover_url.as_deref(), Some("https://cdn/front"));
    assert_eq!(album.release_year, Some(2021));
}

#[tokio::test]
async fn test_artist_avatar_is_resolved() {
    let server = MockServer::start().await;
    mount_get(&server, "Artists/ar-1", json!({
        "id": "ar-1",
        "name": "The Band",
        "avatarFileName": "band.png",
    }))
    .await;
    Mock::given(method("POST"))
        .and(path(api_path("Artists/avatar-urls")))
        .and(body_json(json!({ "fileNames": ["band.png"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fileName": "band.png", "url": "https://cdn/band" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let artist = ArtistManager::new(client)
        .get_artist("ar-1")
        .await
        .expect("artist loads");

    assert_eq!(artist.avatar_url.as_deref(), Some("https://cdn/band"));
}

#[tokio::test]
async fn test_playlist_songs_keep_playlist_order() {
    let server = MockServer::start().await;
    mount_get(&server, "Playlists/pl-1", json!({
        "id": "pl-1",
        "name": "Mix",
        "songIds": ["3", "1"],
    }))
    .await;
    mount_get(&server, "Songs/1", song_json("1", None, None)).await;
    mount_get(&server, "Songs/3", song_json("3", None, None)).await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let details = PlaylistManager::new(client)
        .get_playlist("pl-1", None)
        .await
        .expect("playlist loads");

    let order: Vec<_> = details.songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["3", "1"]);
    assert_eq!(details.playlist.name, "Mix");
}

#[tokio::test]
async fn test_playlist_reload_reuses_urls() {
    let server = MockServer::start().await;
    mount_get(&server, "Playlists/pl-1", json!({ "id": "pl-1", "name": "Mix", "songIds": ["1"] })).await;
    mount_get(&server, "Songs/1", song_json("1", Some("a.mp3"), None)).await;
    Mock::given(method("POST"))
        .and(path(api_path("Songs/audio-urls")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "fileName": "a.mp3", "url": "https://cdn/a" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let manager = PlaylistManager::new(client);
    let first = manager.get_playlist("pl-1", None).await.expect("first load");
    let second = manager
        .get_playlist("pl-1", Some(&first))
        .await
        .expect("second load");

    assert_eq!(second.songs[0].audio_url.as_deref(), Some("https://cdn/a"));
}

#[tokio::test]
async fn test_create_playlist_sends_trimmed_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("Playlists")))
        .and(body_json(json!({ "name": "Road trip" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl-7",
            "name": "Road trip",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let playlist = PlaylistManager::new(client)
        .create_playlist("  Road trip ", Some("  "))
        .await
        .expect("playlist created");

    assert_eq!(playlist.id, "pl-7");
    assert!(playlist.song_ids.is_empty());
}

#[tokio::test]
async fn test_playlist_song_membership_calls() {
    let server = MockServer::start().await;
    for verb in ["POST", "DELETE"] {
        Mock::given(method(verb))
            .and(path(api_path("Playlists/pl-1/songs/s-1")))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path(api_path("Playlists/pl-1")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let manager = PlaylistManager::new(client);
    manager.add_song("pl-1", "s-1").await.expect("added");
    manager.remove_song("pl-1", "s-1").await.expect("removed");
    manager.delete_playlist("pl-1").await.expect("deleted");
}

#[tokio::test]
async fn test_genres_are_sorted_by_name() {
    let server = MockServer::start().await;
    mount_get(&server, "Genres", json!([
        { "id": "g2", "name": "rock" },
        { "id": "g1", "name": "Ambient" },
        { "id": "g3", "name": "jazz" },
    ]))
    .await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let genres = GenreManager::new(client)
        .list_genres()
        .await
        .expect("genres load");

    let names: Vec<_> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Ambient", "jazz", "rock"]);
}

#[tokio::test]
async fn test_favorite_membership() {
    let server = MockServer::start().await;
    mount_get(&server, "Favorites/songs", json!([song_json("1", None, None)])).await;

    let client = client_with(test_config(&server), store_with(None)).await;
    let manager = FavoriteManager::new(client);

    assert!(manager.is_favorite("1").await.expect("favorites load"));
    assert!(!manager.is_favorite("2").await.expect("favorites load"));
}
