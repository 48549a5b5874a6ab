use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::CategoryGroup,
    routes::{non_blank, AppState},
    services::favorites,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFavoriteRequest {
    pub user_id: Option<String>,
    pub movie_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesQuery {
    user_id: Option<String>,
}

/// Handler recording a favorite; re-favoriting succeeds the same way
pub async fn set_favorite(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<UpdateFavoriteRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let user_id = non_blank(request.user_id)
        .ok_or_else(|| AppError::InvalidInput("userId is required.".to_string()))?;
    let movie_id = non_blank(request.movie_id)
        .ok_or_else(|| AppError::InvalidInput("movieId is required.".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        movie_id = %movie_id,
        "Processing favorite update"
    );

    favorites::set_favorite(state.store.as_ref(), &user_id, &movie_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Favorite updated successfully".to_string(),
        }),
    ))
}

/// Handler listing a user's favorites grouped by category
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FavoritesQuery>,
) -> AppResult<Json<Vec<CategoryGroup>>> {
    let user_id = non_blank(params.user_id)
        .ok_or_else(|| AppError::InvalidInput("userId is required.".to_string()))?;

    let groups = favorites::favorites_by_category(state.store.as_ref(), &user_id).await?;
    Ok(Json(groups))
}
