use std::sync::Arc;

use crate::{
    error::AppResult, models::CategoryGroup, services::providers::PopularMoviesProvider,
};

/// Service function for the external popular-movies feed
///
/// Delegates to the configured provider; the upstream order is kept and no
/// fallback content is served when the upstream fails.
pub async fn fetch_popular(provider: Arc<dyn PopularMoviesProvider>) -> AppResult<CategoryGroup> {
    provider.popular_movies().await
}
