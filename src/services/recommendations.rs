use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Movie, MovieGenre, MovieView},
};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Recommends movies related to a seed movie by shared genres
///
/// Candidates are movies sharing at least one genre with the seed (never
/// the seed itself). The shared-genre tally decides which candidates make
/// the top `limit`; the returned list is then ordered by rating, highest
/// first, with missing ratings counted as 0.
pub async fn get_recommendations(
    store: &dyn CatalogStore,
    seed_movie_id: &str,
    limit: usize,
) -> AppResult<Vec<MovieView>> {
    let genre_ids = store.genre_ids_for_movie(seed_movie_id).await?;
    if genre_ids.is_empty() {
        tracing::debug!(seed = %seed_movie_id, "Seed movie has no genres");
        return Ok(Vec::new());
    }

    let links = store
        .links_sharing_genres(&genre_ids, seed_movie_id)
        .await?;

    let selected = rank_candidates(&links, seed_movie_id, limit);
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let mut movies = store.movies_by_ids(&selected).await?;
    order_by_rating(&mut movies);

    tracing::info!(
        seed = %seed_movie_id,
        genres = genre_ids.len(),
        candidates = links.len(),
        returned = movies.len(),
        "Recommendations computed"
    );

    Ok(movies
        .into_iter()
        .map(|movie| MovieView::from(movie).without_release_date())
        .collect())
}

/// Tallies shared-genre links per candidate and keeps the best `limit` ids
///
/// Higher tallies come first; equal tallies are ordered by movie id so the
/// cut at `limit` is deterministic. The seed is excluded even if the links
/// contain it.
fn rank_candidates(links: &[MovieGenre], seed_movie_id: &str, limit: usize) -> Vec<String> {
    let mut tally: HashMap<&str, usize> = HashMap::new();
    for link in links.iter().filter(|link| link.movie_id != seed_movie_id) {
        *tally.entry(link.movie_id.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = tally.into_iter().collect();
    ranked.sort_by(|(id_a, count_a), (id_b, count_b)| {
        count_b.cmp(count_a).then_with(|| id_a.cmp(id_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Final ordering: rating descending (missing as 0), then id ascending
fn order_by_rating(movies: &mut [Movie]) {
    movies.sort_by(|a, b| {
        let rating_a = a.rating.unwrap_or(0.0);
        let rating_b = b.rating.unwrap_or(0.0);
        rating_b
            .partial_cmp(&rating_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}
