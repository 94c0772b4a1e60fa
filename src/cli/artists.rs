use std::sync::Arc;

use crate::{
    cli::{fail, print_albums, print_songs},
    info,
    management::ArtistManager,
    remote::ApiClient,
    utils,
};

pub async fn artists(client: Arc<ApiClient>, id: String, with_songs: bool, with_albums: bool) {
    let manager = ArtistManager::new(client);

    let pb = utils::spinner("Fetching artist...");
    let artist = manager.get_artist(&id).await;
    pb.finish_and_clear();

    match artist {
        Ok(artist) => {
            info!("{}", artist.name);
            if let Some(bio) = artist.bio.filter(|b| !b.trim().is_empty()) {
                println!("{}", bio.trim());
            }
            if let Some(avatar) = artist.avatar_url {
                println!("Avatar: {}", avatar);
            }
        }
        Err(e) => fail("Failed to fetch artist", e),
    }

    if with_albums {
        match manager.get_artist_albums(&id).await {
            Ok(albums) => print_albums(&albums),
            Err(e) => fail("Failed to fetch artist albums", e),
        }
    }

    if with_songs {
        match manager.get_artist_songs(&id).await {
            Ok(songs) => print_songs(&songs),
            Err(e) => fail("Failed to fetch artist songs", e),
        }
    }
}
