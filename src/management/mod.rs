//! Session state, credential persistence and the resource managers.
//!
//! Managers are what the CLI talks to. Each one wraps an
//! [`ApiClient`](crate::remote::ApiClient), fetches entities and runs the
//! [`enrich`](crate::enrich) pass before handing them out.

mod album;
mod artist;
mod download;
mod favorite;
mod genre;
mod playlist;
mod session;
mod song;
mod store;

pub use album::AlbumManager;
pub use artist::ArtistManager;
pub use download::DownloadManager;
pub use favorite::FavoriteManager;
pub use genre::GenreManager;
pub use playlist::PlaylistManager;
pub use session::{EXPIRY_BUFFER_SECS, SessionManager};
pub use song::SongManager;
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
