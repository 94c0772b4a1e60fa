use std::sync::Arc;

use crate::{
    cli::{fail, print_albums, print_songs},
    info,
    management::AlbumManager,
    remote::ApiClient,
    utils,
};

pub async fn albums(client: Arc<ApiClient>, id: String, with_songs: bool) {
    let manager = AlbumManager::new(client);

    let pb = utils::spinner("Fetching album...");
    let album = manager.get_album(&id).await;
    pb.finish_and_clear();

    match album {
        Ok(album) => print_albums(std::slice::from_ref(&album)),
        Err(e) => fail("Failed to fetch album", e),
    }

    if !with_songs {
        return;
    }

    let pb = utils::spinner("Fetching album songs...");
    let songs = manager.get_album_songs(&id).await;
    pb.finish_and_clear();

    match songs {
        Ok(songs) if songs.is_empty() => info!("Album has no songs."),
        Ok(songs) => print_songs(&songs),
        Err(e) => fail("Failed to fetch album songs", e),
    }
}
