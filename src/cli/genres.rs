use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{fail, print_songs},
    info,
    management::GenreManager,
    remote::ApiClient,
    types::GenreTableRow,
    utils,
};

pub async fn list_genres(client: Arc<ApiClient>) {
    let pb = utils::spinner("Fetching genres...");
    let genres = GenreManager::new(client).list_genres().await;
    pb.finish_and_clear();

    match genres {
        Ok(genres) if genres.is_empty() => info!("No genres available."),
        Ok(genres) => {
            let rows: Vec<GenreTableRow> = genres
                .into_iter()
                .map(|g| GenreTableRow {
                    id: g.id,
                    name: g.name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => fail("Failed to fetch genres", e),
    }
}

pub async fn genre_songs(client: Arc<ApiClient>, id: String) {
    let pb = utils::spinner("Fetching genre songs...");
    let songs = GenreManager::new(client).get_genre_songs(&id).await;
    pb.finish_and_clear();

    match songs {
        Ok(songs) => print_songs(&songs),
        Err(e) => fail("Failed to fetch genre songs", e),
    }
}
