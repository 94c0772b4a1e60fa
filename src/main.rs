use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use harmonia::{cli, config, error, management::FileCredentialStore, remote::ApiClient};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in, sign out and inspect the session
    Auth(AuthOptions),

    /// Show songs with playable URLs
    Songs(SongsOptions),

    /// Show an album
    Albums(AlbumsOptions),

    /// Show an artist
    Artists(ArtistsOptions),

    /// Handle your playlists
    Playlists(PlaylistsOptions),

    /// Browse genres
    Genres(GenresOptions),

    /// Handle favorite songs
    Favorites(FavoritesOptions),

    /// Handle downloaded songs
    Downloads(DownloadsOptions),

    /// Configuration and session overview
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthSubcommand {
    /// Exchange a Google ID token for a session
    Login {
        #[clap(long, env = "HARMONIA_GOOGLE_ID_TOKEN", hide_env_values = true)]
        id_token: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored and when it expires
    Status,
}

#[derive(Parser, Debug, Clone)]
pub struct SongsOptions {
    /// Song IDs
    #[clap(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AlbumsOptions {
    pub id: String,

    /// Also list the album's songs
    #[clap(long)]
    pub songs: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    pub id: String,

    /// Also list the artist's songs
    #[clap(long)]
    pub songs: bool,

    /// Also list the artist's albums
    #[clap(long)]
    pub albums: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Handle your playlists")]
pub struct PlaylistsOptions {
    /// Subcommands under `playlists`; lists playlists when omitted
    #[command(subcommand)]
    pub command: Option<PlaylistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistsSubcommand {
    /// Show a playlist with its songs
    Show { id: String },
    /// Create a playlist
    Create {
        name: String,
        #[clap(long)]
        description: Option<String>,
    },
    /// Add a song to a playlist
    Add { playlist_id: String, song_id: String },
    /// Remove a song from a playlist
    Remove { playlist_id: String, song_id: String },
    /// Delete a playlist
    Delete { id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct GenresOptions {
    #[command(subcommand)]
    pub command: Option<GenresSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum GenresSubcommand {
    /// List the songs of a genre
    Songs { id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct FavoritesOptions {
    #[command(subcommand)]
    pub command: Option<FavoritesSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesSubcommand {
    /// Mark a song as favorite
    Add { song_id: String },
    /// Unmark a favorite song
    Remove { song_id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadsOptions {
    #[command(subcommand)]
    pub command: Option<DownloadsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DownloadsSubcommand {
    /// Download songs for offline use
    Add {
        #[clap(required = true, num_args = 1..)]
        song_ids: Vec<String>,
    },
    /// Delete a downloaded song
    Remove { song_id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "harmonia=warn",
        1 => "harmonia=debug",
        _ => "harmonia=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let store = Arc::new(FileCredentialStore::default_location());
    let client = match ApiClient::connect(config, store).await {
        Ok(client) => Arc::new(client),
        Err(e) => error!("Cannot set up the API client: {}", e),
    };

    match cli.command {
        Command::Auth(opt) => match opt.command {
            AuthSubcommand::Login { id_token } => cli::login(client, id_token).await,
            AuthSubcommand::Logout => cli::logout(client).await,
            AuthSubcommand::Status => cli::status(client).await,
        },
        Command::Songs(opt) => cli::songs(client, opt.ids).await,
        Command::Albums(opt) => cli::albums(client, opt.id, opt.songs).await,
        Command::Artists(opt) => cli::artists(client, opt.id, opt.songs, opt.albums).await,
        Command::Playlists(opt) => match opt.command {
            None => cli::list_playlists(client).await,
            Some(PlaylistsSubcommand::Show { id }) => cli::show_playlist(client, id).await,
            Some(PlaylistsSubcommand::Create { name, description }) => {
                cli::create_playlist(client, name, description).await
            }
            Some(PlaylistsSubcommand::Add {
                playlist_id,
                song_id,
            }) => cli::add_playlist_song(client, playlist_id, song_id).await,
            Some(PlaylistsSubcommand::Remove {
                playlist_id,
                song_id,
            }) => cli::remove_playlist_song(client, playlist_id, song_id).await,
            Some(PlaylistsSubcommand::Delete { id }) => cli::delete_playlist(client, id).await,
        },
        Command::Genres(opt) => match opt.command {
            None => cli::list_genres(client).await,
            Some(GenresSubcommand::Songs { id }) => cli::genre_songs(client, id).await,
        },
        Command::Favorites(opt) => match opt.command {
            None => cli::list_favorites(client).await,
            Some(FavoritesSubcommand::Add { song_id }) => cli::add_favorite(client, song_id).await,
            Some(FavoritesSubcommand::Remove { song_id }) => {
                cli::remove_favorite(client, song_id).await
            }
        },
        Command::Downloads(opt) => match opt.command {
            None => cli::list_downloads(client).await,
            Some(DownloadsSubcommand::Add { song_ids }) => cli::add_download(client, song_ids).await,
            Some(DownloadsSubcommand::Remove { song_id }) => {
                cli::remove_download(client, song_id).await
            }
        },
        Command::Info => cli::info(client).await,
        Command::Completions(_) => {}
    }
}
