//! # CLI Module
//!
//! Command implementations for the `harmonia` binary. Each command builds the
//! manager it needs from the shared [`ApiClient`], calls it, and renders the
//! result as a table or a status line.
//!
//! ```text
//! CLI Layer (this module)
//!     ↓
//! Management Layer (resource managers, download cache, session)
//!     ↓
//! Remote Layer (transport, token refresh, typed endpoints)
//! ```
//!
//! ## Error Handling
//!
//! Library errors end the process through [`crate::error!`]. Authentication
//! errors get a hint to log in again; partial failures (a song that failed
//! to load, a cover that could not be resolved) only show up as missing
//! rows or empty columns.
//!
//! ## Usage
//!
//! ```bash
//! harmonia auth login --id-token <TOKEN>
//! harmonia songs 12 57 98
//! harmonia albums 7 --songs
//! harmonia playlists show 3
//! harmonia downloads add 12
//! ```

mod albums;
mod artists;
mod auth;
mod downloads;
mod favorites;
mod genres;
mod info;
mod playlists;
mod songs;

pub use albums::albums;
pub use artists::artists;
pub use auth::{login, logout, status};
pub use downloads::{add_download, list_downloads, remove_download};
pub use favorites::{add_favorite, list_favorites, remove_favorite};
pub use genres::{genre_songs, list_genres};
pub use info::info;
pub use playlists::{
    add_playlist_song, create_playlist, delete_playlist, list_playlists, remove_playlist_song,
    show_playlist,
};
pub use songs::songs;

use tabled::Table;

use crate::{
    error,
    error::ApiError,
    types::{Album, AlbumTableRow, Song, SongTableRow},
    utils,
};

/// Ends the process with a message fitting the error.
pub(crate) fn fail(context: &str, e: ApiError) -> ! {
    if e.is_auth_error() && !matches!(e, ApiError::NotAuthenticated) {
        error!("{}: {}\nRun harmonia auth login to sign in again.", context, e);
    }
    error!("{}: {}", context, e)
}

pub(crate) fn print_songs(songs: &[Song]) {
    let rows: Vec<SongTableRow> = songs
        .iter()
        .map(|s| SongTableRow {
            id: s.id.clone(),
            title: s.title.clone(),
            artist: s.artist_name.clone().unwrap_or_default(),
            album: s.album_title.clone().unwrap_or_default(),
            duration: utils::format_duration(s.duration_seconds),
            playable: if utils::is_blank(s.audio_url.as_deref()) {
                "no".to_string()
            } else {
                "yes".to_string()
            },
        })
        .collect();

    println!("{}", Table::new(rows));
}

pub(crate) fn print_albums(albums: &[Album]) {
    let rows: Vec<AlbumTableRow> = albums
        .iter()
        .map(|a| AlbumTableRow {
            id: a.id.clone(),
            title: a.title.clone(),
            artist: a.artist_name.clone().unwrap_or_default(),
            year: a.release_year.map(|y| y.to_string()).unwrap_or_default(),
            cover: a.cover_url.clone().unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
