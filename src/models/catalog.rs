use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Top-level grouping shown as a row in the client catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog movie as stored. Display fields are nullable here and only
/// get defaults when turned into a [`MovieView`](super::MovieView).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: String,
    pub title: String,
    /// Normalized 0.0 - 1.0
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub horizontal_image: Option<String>,
    pub vertical_image_small: Option<String>,
    pub vertical_image_large: Option<String>,
    pub trailer_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Link between a movie and one of its genres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieGenre {
    pub movie_id: String,
    pub genre_id: String,
    pub created_at: DateTime<Utc>,
}

/// A (user, movie) favorite relation; the pair is unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub user_id: String,
    pub movie_id: String,
    pub created_at: DateTime<Utc>,
}

/// Shadow row of an identity-provider user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// A category together with the movies it owns, in store order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWithMovies {
    pub category: Category,
    pub movies: Vec<Movie>,
}

/// A favorite row joined with its movie, if the movie still resolves
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteMovie {
    pub movie_id: String,
    pub movie: Option<Movie>,
}

/// Genre columns reached through a movie's genre link
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedGenre {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Values for a movie row about to be inserted
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewMovie {
    pub title: String,
    pub rating: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub trailer_url: Option<String>,
    pub horizontal_image: Option<String>,
    pub vertical_image_small: Option<String>,
    pub vertical_image_large: Option<String>,
}
