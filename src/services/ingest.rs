use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::task::JoinSet;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Movie, NewMovie},
    services::providers::ImageStorage,
};

pub const MOVIE_CREATED_MESSAGE: &str = "Movie created successfully!";

/// Artwork slots a movie can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSlot {
    Horizontal,
    VerticalSmall,
    VerticalLarge,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 3] = [
        ImageSlot::Horizontal,
        ImageSlot::VerticalSmall,
        ImageSlot::VerticalLarge,
    ];

    /// Form field (and storage folder) name of the slot
    pub fn field_name(&self) -> &'static str {
        match self {
            ImageSlot::Horizontal => "horizontal_image",
            ImageSlot::VerticalSmall => "vertical_image_small",
            ImageSlot::VerticalLarge => "vertical_image_large",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }
}

/// One uploaded artwork file
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub slot: ImageSlot,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Object path: `<slot field>/<file name>`, dropping any client-side
    /// directory components of the file name
    pub fn storage_path(&self) -> String {
        let base_name = self
            .file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name);
        format!("{}/{}", self.slot.field_name(), base_name)
    }
}

/// Validated input of the create-movie flow
#[derive(Debug, Clone)]
pub struct CreateMovieRequest {
    pub title: String,
    pub rating: f64,
    pub release_date: NaiveDate,
    pub category_id: String,
    pub trailer_url: String,
    pub images: Vec<ImageUpload>,
}

/// Uploads the artwork and inserts the movie row
///
/// All uploads run concurrently and must succeed before anything is written
/// to the store.
pub async fn create_movie(
    store: &dyn CatalogStore,
    storage: Arc<dyn ImageStorage>,
    request: CreateMovieRequest,
) -> AppResult<Movie> {
    let image_count = request.images.len();
    let mut urls = upload_images(storage, request.images).await?;

    let new_movie = NewMovie {
        title: request.title,
        rating: Some(request.rating),
        release_date: Some(request.release_date),
        category_id: Some(request.category_id),
        trailer_url: Some(request.trailer_url),
        horizontal_image: urls.remove(&ImageSlot::Horizontal),
        vertical_image_small: urls.remove(&ImageSlot::VerticalSmall),
        vertical_image_large: urls.remove(&ImageSlot::VerticalLarge),
    };

    let movie = store.insert_movie(new_movie).await?;

    tracing::info!(
        movie_id = %movie.id,
        title = %movie.title,
        images = image_count,
        "Movie created"
    );

    Ok(movie)
}

/// Runs every upload concurrently. The first failure is returned and the
/// uploads still in flight are aborted when the set is dropped.
async fn upload_images(
    storage: Arc<dyn ImageStorage>,
    images: Vec<ImageUpload>,
) -> AppResult<HashMap<ImageSlot, String>> {
    let mut uploads = JoinSet::new();

    for image in images {
        let storage = storage.clone();
        uploads.spawn(async move {
            let path = image.storage_path();
            let url = storage
                .upload(&path, image.bytes, &image.content_type)
                .await?;
            Ok::<_, AppError>((image.slot, url))
        });
    }

    let mut urls = HashMap::new();
    while let Some(joined) = uploads.join_next().await {
        let (slot, url) =
            joined.map_err(|e| AppError::Internal(format!("Upload task failed: {}", e)))??;
        urls.insert(slot, url);
    }

    Ok(urls)
}
