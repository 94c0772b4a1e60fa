use std::sync::Arc;

use crate::{
    cli::{fail, print_songs},
    management::SongManager,
    remote::ApiClient,
    utils, warning,
};

pub async fn songs(client: Arc<ApiClient>, ids: Vec<String>) {
    let pb = utils::spinner("Fetching songs...");
    let result = SongManager::new(client).get_songs(&ids, None).await;
    pb.finish_and_clear();

    let songs = match result {
        Ok(songs) => songs,
        Err(e) => fail("Failed to fetch songs", e),
    };

    if songs.len() < ids.len() {
        warning!("{} of {} songs could not be loaded.", ids.len() - songs.len(), ids.len());
    }
    print_songs(&songs);
}
