use serde::Deserialize;

use super::MovieView;

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw page returned by TMDB's `/movie/popular`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<TmdbMovie>,
}

/// One entry of a TMDB listing
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    pub title: String,
    /// 0 - 10 scale
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl TmdbMovie {
    /// Maps the upstream item onto the catalog view, rescaling the rating to
    /// 0 - 1 and prefixing the poster path with the image CDN base. The
    /// numeric TMDB id becomes the view's text id.
    pub fn into_view(self, image_base_url: &str) -> MovieView {
        let vertical_image_large = self
            .poster_path
            .map(|path| format!("{}{}", image_base_url, path))
            .unwrap_or_default();

        MovieView {
            id: self.id.to_string(),
            title: self.title,
            rating: self.vote_average / 10.0,
            release_date: Some(self.release_date.unwrap_or_default()),
            horizontal_image: None,
            vertical_image_large,
            is_favorite: None,
        }
    }
}
