use crate::{
    error::AppResult,
    models::{
        Category, CategoryWithMovies, Favorite, FavoriteMovie, Genre, LinkedGenre, Movie,
        MovieGenre, NewMovie, Profile,
    },
};

/// Typed query façade over the relational store
///
/// Every method is a single round trip. An empty result is a valid outcome
/// and is returned as an empty collection or `None`; only a failing query
/// produces an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Movie ids the user has favorited
    async fn favorite_movie_ids(&self, user_id: &str) -> AppResult<Vec<String>>;

    /// All categories joined with the movies they own
    async fn categories_with_movies(&self) -> AppResult<Vec<CategoryWithMovies>>;

    /// Ids of the movies linked to a genre
    async fn movie_ids_with_genre(&self, genre_id: &str) -> AppResult<Vec<String>>;

    async fn find_movie(&self, movie_id: &str) -> AppResult<Option<Movie>>;

    /// Genre links of a movie; `None` where the link's genre does not resolve
    async fn movie_genre_links(&self, movie_id: &str) -> AppResult<Vec<Option<LinkedGenre>>>;

    /// All genres ordered by name
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    async fn genre_ids_for_movie(&self, movie_id: &str) -> AppResult<Vec<String>>;

    /// Genre links touching any of `genre_ids`, excluding `exclude_movie_id`
    async fn links_sharing_genres(
        &self,
        genre_ids: &[String],
        exclude_movie_id: &str,
    ) -> AppResult<Vec<MovieGenre>>;

    async fn movies_by_ids(&self, movie_ids: &[String]) -> AppResult<Vec<Movie>>;

    /// Inserts the favorite or keeps the existing one, returning the stored
    /// row. `None` means the statement affected no rows.
    async fn upsert_favorite(&self, user_id: &str, movie_id: &str)
        -> AppResult<Option<Favorite>>;

    /// Favorites of a user joined with their movies
    async fn favorites_with_movies(&self, user_id: &str) -> AppResult<Vec<FavoriteMovie>>;

    async fn categories_by_ids(&self, category_ids: &[String]) -> AppResult<Vec<Category>>;

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie>;

    async fn insert_profile(&self, profile_id: &str) -> AppResult<Profile>;

    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<Profile>>;
}
