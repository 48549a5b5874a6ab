use std::collections::{HashMap, HashSet};

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{CategoryGroup, Favorite, MovieView},
};

/// Resolves the set of movie ids the viewer has favorited
///
/// Anonymous viewers have no favorites. A viewer without favorite rows gets
/// an empty set; only a failing query is an error.
pub async fn resolve_favorite_ids(
    store: &dyn CatalogStore,
    viewer_id: Option<&str>,
) -> AppResult<HashSet<String>> {
    let Some(viewer_id) = viewer_id else {
        return Ok(HashSet::new());
    };

    let ids = store.favorite_movie_ids(viewer_id).await?;
    tracing::debug!(viewer_id = %viewer_id, favorites = ids.len(), "Resolved favorite ids");

    Ok(ids.into_iter().collect())
}

/// Records a (user, movie) favorite
///
/// Re-favoriting is a no-op success that returns the existing row. An upsert
/// that reports no affected rows is an error of its own.
pub async fn set_favorite(
    store: &dyn CatalogStore,
    user_id: &str,
    movie_id: &str,
) -> AppResult<Favorite> {
    let favorite = store
        .upsert_favorite(user_id, movie_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(user_id = %user_id, movie_id = %movie_id, "Favorite upsert returned no rows");
            AppError::MutationNotApplied(
                "No data returned from store after updating favorites".to_string(),
            )
        })?;

    tracing::info!(user_id = %user_id, movie_id = %movie_id, "Favorite recorded");

    Ok(favorite)
}

/// Lists a user's favorites grouped by the category of each movie
///
/// Only categories holding at least one favorited movie appear, in store
/// order. Favorites whose movie has no category are left out.
pub async fn favorites_by_category(
    store: &dyn CatalogStore,
    user_id: &str,
) -> AppResult<Vec<CategoryGroup>> {
    let favorites = store.favorites_with_movies(user_id).await?;
    if favorites.is_empty() {
        return Ok(Vec::new());
    }

    let mut movies_by_category: HashMap<String, Vec<MovieView>> = HashMap::new();
    let mut category_ids: Vec<String> = Vec::new();

    for favorite in favorites {
        let Some(movie) = favorite.movie else {
            tracing::debug!(movie_id = %favorite.movie_id, "Favorite points at a missing movie");
            continue;
        };
        let Some(category_id) = movie.category_id.clone() else {
            continue;
        };

        if !movies_by_category.contains_key(&category_id) {
            category_ids.push(category_id.clone());
        }
        movies_by_category
            .entry(category_id)
            .or_default()
            .push(MovieView::from(movie));
    }

    if category_ids.is_empty() {
        return Ok(Vec::new());
    }

    let categories = store.categories_by_ids(&category_ids).await?;

    let groups: Vec<CategoryGroup> = categories
        .into_iter()
        .filter_map(|category| {
            movies_by_category
                .remove(&category.id)
                .map(|movies| CategoryGroup {
                    name: category.name,
                    movies,
                })
        })
        .collect();

    tracing::info!(
        user_id = %user_id,
        categories = groups.len(),
        "Favorites grouped by category"
    );

    Ok(groups)
}
