use std::collections::HashSet;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{CategoryGroup, CategoryWithMovies, GenreSummary, MovieDetails, MovieView},
    services::favorites::resolve_favorite_ids,
};

/// Lists every category with its movies, flagging the viewer's favorites
///
/// Categories without movies are still returned. Categories and the movies
/// within them keep the store's order.
pub async fn group_by_category(
    store: &dyn CatalogStore,
    viewer_id: Option<&str>,
) -> AppResult<Vec<CategoryGroup>> {
    let (favorite_ids, categories) = tokio::try_join!(
        resolve_favorite_ids(store, viewer_id),
        store.categories_with_movies(),
    )?;

    let groups = shape_groups(categories, &favorite_ids, None);

    tracing::info!(
        categories = groups.len(),
        movies = groups.iter().map(|g| g.movies.len()).sum::<usize>(),
        "Movies grouped by category"
    );

    Ok(groups)
}

/// Same shape as [`group_by_category`], keeping only movies linked to
/// `genre_id`
///
/// Filtering happens inside each category; a category left without matching
/// movies is still emitted with an empty list.
pub async fn group_by_genre(
    store: &dyn CatalogStore,
    genre_id: &str,
    viewer_id: Option<&str>,
) -> AppResult<Vec<CategoryGroup>> {
    let (favorite_ids, categories, genre_movie_ids) = tokio::try_join!(
        resolve_favorite_ids(store, viewer_id),
        store.categories_with_movies(),
        store.movie_ids_with_genre(genre_id),
    )?;

    let in_genre: HashSet<String> = genre_movie_ids.into_iter().collect();
    let groups = shape_groups(categories, &favorite_ids, Some(&in_genre));

    tracing::info!(
        genre_id = %genre_id,
        categories = groups.len(),
        movies = groups.iter().map(|g| g.movies.len()).sum::<usize>(),
        "Movies grouped by category for genre"
    );

    Ok(groups)
}

/// Builds the client-facing groups from joined store rows
///
/// With `only` set, movies outside that id set are dropped from their
/// category; the category itself stays.
fn shape_groups(
    categories: Vec<CategoryWithMovies>,
    favorite_ids: &HashSet<String>,
    only: Option<&HashSet<String>>,
) -> Vec<CategoryGroup> {
    categories
        .into_iter()
        .map(|entry| CategoryGroup {
            name: entry.category.name,
            movies: entry
                .movies
                .into_iter()
                .filter(|movie| only.map_or(true, |ids| ids.contains(&movie.id)))
                .map(|movie| {
                    let is_favorite = favorite_ids.contains(&movie.id);
                    MovieView::from(movie).with_favorite(is_favorite)
                })
                .collect(),
        })
        .collect()
}

/// Fetches one movie with its genre list
pub async fn movie_details(store: &dyn CatalogStore, movie_id: &str) -> AppResult<MovieDetails> {
    let (movie, links) = tokio::try_join!(
        store.find_movie(movie_id),
        store.movie_genre_links(movie_id),
    )?;

    let movie =
        movie.ok_or_else(|| AppError::NotFound(format!("Movie {} does not exist", movie_id)))?;

    let genres: Vec<GenreSummary> = links
        .into_iter()
        .filter_map(GenreSummary::from_link)
        .collect();

    Ok(MovieDetails::new(movie, genres))
}

/// All genres, alphabetical by name
pub async fn list_genres(store: &dyn CatalogStore) -> AppResult<Vec<GenreSummary>> {
    let genres = store.list_genres().await?;
    Ok(genres.into_iter().map(GenreSummary::from).collect())
}
