use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Genre, LinkedGenre, Movie};

const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";
const UNKNOWN_GENRE_ID: &str = "unknown";
const UNNAMED_GENRE: &str = "Unnamed Genre";

/// Movie shape returned to the client
///
/// Fields that some endpoints do not expose (`release_date` on
/// recommendations, `horizontal_image` on the external feed, `isFavorite`
/// outside the catalog listings) are `None` and omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieView {
    pub id: String,
    pub title: String,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_image: Option<String>,
    pub vertical_image_large: String,
    #[serde(
        rename = "isFavorite",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_favorite: Option<bool>,
}

impl MovieView {
    /// Marks the view with the viewer's favorite state
    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    /// Reduced field set used by recommendations
    pub fn without_release_date(mut self) -> Self {
        self.release_date = None;
        self
    }
}

/// The one place nullable display fields get their defaults: a null rating
/// becomes 0 and null strings become empty strings.
impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            rating: movie.rating.unwrap_or(0.0),
            release_date: Some(
                movie
                    .release_date
                    .map(|date| date.format(RELEASE_DATE_FORMAT).to_string())
                    .unwrap_or_default(),
            ),
            horizontal_image: Some(movie.horizontal_image.unwrap_or_default()),
            vertical_image_large: movie.vertical_image_large.unwrap_or_default(),
            is_favorite: None,
        }
    }
}

/// A named row of movies (a category, or an external feed)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub movies: Vec<MovieView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreSummary {
    pub id: String,
    pub name: String,
}

impl From<Genre> for GenreSummary {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

impl GenreSummary {
    /// Resolves a genre reached through a movie's genre link
    ///
    /// A link without a genre row is dropped; missing or empty columns fall
    /// back to placeholder values.
    pub fn from_link(link: Option<LinkedGenre>) -> Option<Self> {
        link.map(|genre| Self {
            id: genre
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| UNKNOWN_GENRE_ID.to_string()),
            name: genre
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNNAMED_GENRE.to_string()),
        })
    }
}

/// Full record of a single movie with its genres
///
/// Unlike [`MovieView`], nullable fields are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: String,
    pub title: String,
    pub rating: Option<f64>,
    pub horizontal_image: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub trailer_url: Option<String>,
    pub vertical_image_small: Option<String>,
    pub vertical_image_large: Option<String>,
    pub category_id: Option<String>,
    pub genres: Vec<GenreSummary>,
}

impl MovieDetails {
    pub fn new(movie: Movie, genres: Vec<GenreSummary>) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            rating: movie.rating,
            horizontal_image: movie.horizontal_image,
            release_date: movie.release_date,
            trailer_url: movie.trailer_url,
            vertical_image_small: movie.vertical_image_small,
            vertical_image_large: movie.vertical_image_large,
            category_id: movie.category_id,
            genres,
        }
    }
}
