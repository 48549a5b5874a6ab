use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{CategoryGroup, GenreSummary, MovieDetails, MovieView},
    routes::{non_blank, AppState},
    services::{
        catalog,
        ingest::{self, CreateMovieRequest, ImageSlot, ImageUpload, MOVIE_CREATED_MESSAGE},
        recommendations::{self, DEFAULT_RECOMMENDATION_LIMIT},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    user_logged: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreQuery {
    genre_id: Option<String>,
    user_logged: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    movie_id: Option<String>,
}

/// Handler for the catalog listing grouped by category
pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> AppResult<Json<Vec<CategoryGroup>>> {
    let viewer = non_blank(params.user_logged);
    let groups = catalog::group_by_category(state.store.as_ref(), viewer.as_deref()).await?;
    Ok(Json(groups))
}

/// Handler for the catalog listing restricted to one genre
pub async fn list_by_genre(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<CategoryGroup>>> {
    let genre_id = non_blank(params.genre_id)
        .ok_or_else(|| AppError::InvalidInput("genreId is required.".to_string()))?;
    let viewer = non_blank(params.user_logged);

    let groups =
        catalog::group_by_genre(state.store.as_ref(), &genre_id, viewer.as_deref()).await?;
    Ok(Json(groups))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    let details = catalog::movie_details(state.store.as_ref(), &movie_id).await?;
    Ok(Json(details))
}

pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<GenreSummary>>> {
    let genres = catalog::list_genres(state.store.as_ref()).await?;
    Ok(Json(genres))
}

/// Handler for related-movie recommendations
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<MovieView>>> {
    let movie_id = non_blank(params.movie_id)
        .ok_or_else(|| AppError::InvalidInput("movieId is required.".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %movie_id,
        "Processing recommendation request"
    );

    let movies = recommendations::get_recommendations(
        state.store.as_ref(),
        &movie_id,
        DEFAULT_RECOMMENDATION_LIMIT,
    )
    .await?;

    Ok(Json(movies))
}

/// Raw text fields of the create-movie form
#[derive(Debug, Default)]
pub struct MovieForm {
    pub title: Option<String>,
    pub rating: Option<String>,
    pub release_date: Option<String>,
    pub category_id: Option<String>,
    pub trailer_url: Option<String>,
    pub images: Vec<ImageUpload>,
}

impl MovieForm {
    /// Checks every field and produces the typed request
    pub fn validate(self) -> AppResult<CreateMovieRequest> {
        let title = required(self.title, "title")?;
        let category_id = required(self.category_id, "category_id")?;
        let trailer_url = required(self.trailer_url, "trailer_url")?;

        let rating_text = required(self.rating, "rating")?;
        let rating: f64 = rating_text
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("Invalid rating: {}", rating_text)))?;
        if !(0.0..=1.0).contains(&rating) {
            return Err(AppError::InvalidInput(
                "rating must be between 0 and 1".to_string(),
            ));
        }

        let date_text = required(self.release_date, "release_date")?;
        let release_date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| {
            AppError::InvalidInput(format!("Invalid release_date: {}", date_text))
        })?;

        Ok(CreateMovieRequest {
            title,
            rating,
            release_date,
            category_id,
            trailer_url,
            images: self.images,
        })
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    non_blank(value).ok_or_else(|| AppError::InvalidInput(format!("{} is required.", field)))
}

/// Reads the multipart body into a [`MovieForm`]
async fn read_movie_form(mut multipart: Multipart) -> AppResult<MovieForm> {
    let mut form = MovieForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(slot) = ImageSlot::from_field_name(&name) {
            if form.images.iter().any(|image| image.slot == slot) {
                return Err(AppError::InvalidInput(format!(
                    "Only one file allowed for {}",
                    name
                )));
            }

            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|f| !f.is_empty())
                .ok_or_else(|| AppError::InvalidInput(format!("Invalid file for {}", name)))?;
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;

            if bytes.is_empty() {
                return Err(AppError::InvalidInput(format!("Invalid file for {}", name)));
            }

            form.images.push(ImageUpload {
                slot,
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        match name.as_str() {
            "title" => form.title = Some(value),
            "rating" => form.rating = Some(value),
            "release_date" => form.release_date = Some(value),
            "category_id" => form.category_id = Some(value),
            "trailer_url" => form.trailer_url = Some(value),
            other => tracing::debug!(field = %other, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Handler for movie ingestion with uploaded artwork
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, String)> {
    let request = read_movie_form(multipart).await?.validate()?;

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        images = request.images.len(),
        "Processing create movie request"
    );

    ingest::create_movie(state.store.as_ref(), state.image_storage.clone(), request).await?;

    Ok((StatusCode::CREATED, MOVIE_CREATED_MESSAGE.to_string()))
}
