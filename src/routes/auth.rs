use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{Credentials, LoginResponse},
    routes::AppState,
    services::identity::{self, USER_REGISTERED_MESSAGE},
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, String)> {
    identity::register(state.identity.as_ref(), state.store.as_ref(), &credentials).await?;
    Ok((StatusCode::CREATED, USER_REGISTERED_MESSAGE.to_string()))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let response =
        identity::login(state.identity.as_ref(), state.store.as_ref(), &credentials).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
