//! Harmonia Music Streaming Client Library
//!
//! Authenticated access to the Harmonia REST API plus the resource managers
//! built on top of it. The command-line front end in `main.rs` is one
//! consumer; anything that can hold an [`remote::ApiClient`] can be another.
//!
//! # Modules
//!
//! - `cli` - Command implementations for the `harmonia` binary
//! - `config` - Configuration from the environment and `.env`
//! - `enrich` - Batched presigned-URL resolution
//! - `error` - Error types
//! - `management` - Session, credential stores and resource managers
//! - `remote` - HTTP transport, token refresh and typed endpoints
//! - `types` - Wire and domain types
//! - `utils` - Small helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use harmonia::{config::Config, management::{FileCredentialStore, SongManager}, remote::ApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("https://api.harmonia.example/api/v1")?;
//!     let store = Arc::new(FileCredentialStore::default_location());
//!     let client = Arc::new(ApiClient::connect(config, store).await?);
//!     let song = SongManager::new(client).get_song("42").await?;
//!     println!("{} -> {:?}", song.title, song.audio_url);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod enrich;
pub mod error;
pub mod management;
pub mod remote;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loading playlist {}...", id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Downloaded {} songs", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the command layer; library code returns errors.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Song {} has no playable URL", id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
