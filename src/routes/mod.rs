use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod auth;
pub mod favorites;
pub mod movies;
pub mod state;
pub mod tmdb;

pub use state::AppState;

/// Multipart bodies carry up to three images
const CREATE_MOVIE_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/movies", movie_routes())
        .nest("/tmdb", tmdb_routes())
        .nest("/auth", auth_routes())
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Catalog routes under /movies
fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(movies::list_by_category))
        .route("/by-genre", get(movies::list_by_genre))
        .route("/genres", get(movies::list_genres))
        .route("/recommendations", get(movies::recommendations))
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::set_favorite),
        )
        .route(
            "/create",
            post(movies::create_movie).layer(DefaultBodyLimit::max(CREATE_MOVIE_BODY_LIMIT)),
        )
        .route("/:id", get(movies::get_movie))
}

fn tmdb_routes() -> Router<Arc<AppState>> {
    Router::new().route("/popular", get(tmdb::popular))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Treats an absent or blank query value as missing
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
