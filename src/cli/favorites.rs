use std::sync::Arc;

use crate::{
    cli::{fail, print_songs},
    info,
    management::FavoriteManager,
    remote::ApiClient,
    success, utils,
};

pub async fn list_favorites(client: Arc<ApiClient>) {
    let pb = utils::spinner("Fetching favorites...");
    let songs = FavoriteManager::new(client).list_favorites(None).await;
    pb.finish_and_clear();

    match songs {
        Ok(songs) if songs.is_empty() => info!("No favorite songs yet."),
        Ok(songs) => print_songs(&songs),
        Err(e) => fail("Failed to fetch favorites", e),
    }
}

pub async fn add_favorite(client: Arc<ApiClient>, song_id: String) {
    let manager = FavoriteManager::new(client);
    match manager.is_favorite(&song_id).await {
        Ok(true) => {
            info!("Song {} is already a favorite.", song_id);
            return;
        }
        Ok(false) => {}
        Err(e) => fail("Failed to check favorites", e),
    }

    match manager.add_favorite(&song_id).await {
        Ok(()) => success!("Added song {} to favorites.", song_id),
        Err(e) => fail("Failed to add favorite", e),
    }
}

pub async fn remove_favorite(client: Arc<ApiClient>, song_id: String) {
    match FavoriteManager::new(client).remove_favorite(&song_id).await {
        Ok(()) => success!("Removed song {} from favorites.", song_id),
        Err(e) => fail("Failed to remove favorite", e),
    }
}
