use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{error::AppResult, models::CategoryGroup, routes::AppState, services::popular};

/// Handler for the external popular-movies feed
pub async fn popular(State(state): State<Arc<AppState>>) -> AppResult<Json<CategoryGroup>> {
    let group = popular::fetch_popular(state.popular_provider.clone()).await?;
    Ok(Json(group))
}
