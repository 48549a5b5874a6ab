use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::CatalogStore,
    error::{AppResult, DbContext},
    models::{
        Category, CategoryWithMovies, Favorite, FavoriteMovie, Genre, LinkedGenre, Movie,
        MovieGenre, NewMovie, Profile,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str = "id, title, rating, release_date, category_id, horizontal_image, \
     vertical_image_small, vertical_image_large, trailer_url, created_at";

/// Movie columns reached through an outer join, all nullable
#[derive(Debug, sqlx::FromRow)]
struct JoinedMovieRow {
    movie_id: Option<String>,
    movie_title: Option<String>,
    movie_rating: Option<f64>,
    movie_release_date: Option<NaiveDate>,
    movie_category_id: Option<String>,
    movie_horizontal_image: Option<String>,
    movie_vertical_image_small: Option<String>,
    movie_vertical_image_large: Option<String>,
    movie_trailer_url: Option<String>,
    movie_created_at: Option<DateTime<Utc>>,
}

impl JoinedMovieRow {
    fn into_movie(self) -> Option<Movie> {
        Some(Movie {
            id: self.movie_id?,
            title: self.movie_title?,
            rating: self.movie_rating,
            release_date: self.movie_release_date,
            category_id: self.movie_category_id,
            horizontal_image: self.movie_horizontal_image,
            vertical_image_small: self.movie_vertical_image_small,
            vertical_image_large: self.movie_vertical_image_large,
            trailer_url: self.movie_trailer_url,
            created_at: self.movie_created_at?,
        })
    }
}

const JOINED_MOVIE_COLUMNS: &str = "m.id AS movie_id, m.title AS movie_title, \
     m.rating AS movie_rating, m.release_date AS movie_release_date, \
     m.category_id AS movie_category_id, m.horizontal_image AS movie_horizontal_image, \
     m.vertical_image_small AS movie_vertical_image_small, \
     m.vertical_image_large AS movie_vertical_image_large, \
     m.trailer_url AS movie_trailer_url, m.created_at AS movie_created_at";

#[derive(Debug, sqlx::FromRow)]
struct CategoryMovieRow {
    category_id: String,
    category_name: String,
    category_created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    movie: JoinedMovieRow,
}

#[derive(Debug, sqlx::FromRow)]
struct FavoriteMovieRow {
    favorite_movie_id: String,
    #[sqlx(flatten)]
    movie: JoinedMovieRow,
}

#[derive(Debug, sqlx::FromRow)]
struct GenreLinkRow {
    genre_id: Option<String>,
    genre_name: Option<String>,
}

/// Folds category ⋈ movie rows into one group per category, keeping row order
fn group_category_rows(rows: Vec<CategoryMovieRow>) -> Vec<CategoryWithMovies> {
    let mut groups: Vec<CategoryWithMovies> = Vec::new();

    for row in rows {
        let starts_new_group = groups
            .last()
            .map_or(true, |group| group.category.id != row.category_id);

        if starts_new_group {
            groups.push(CategoryWithMovies {
                category: Category {
                    id: row.category_id,
                    name: row.category_name,
                    created_at: row.category_created_at,
                },
                movies: Vec::new(),
            });
        }

        if let (Some(movie), Some(group)) = (row.movie.into_movie(), groups.last_mut()) {
            group.movies.push(movie);
        }
    }

    groups
}

/// [`CatalogStore`] backed by PostgreSQL
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn favorite_movie_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar(
            "SELECT movie_id FROM favorites WHERE user_id = $1 ORDER BY created_at, movie_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .db_context("fetching favorite movie ids")
    }

    async fn categories_with_movies(&self) -> AppResult<Vec<CategoryWithMovies>> {
        let sql = format!(
            "SELECT c.id AS category_id, c.name AS category_name, \
                    c.created_at AS category_created_at, {JOINED_MOVIE_COLUMNS} \
             FROM categories c \
             LEFT JOIN movies m ON m.category_id = c.id \
             ORDER BY c.created_at, c.id, m.created_at, m.id"
        );

        let rows: Vec<CategoryMovieRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .db_context("fetching movies by category")?;

        Ok(group_category_rows(rows))
    }

    async fn movie_ids_with_genre(&self, genre_id: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT movie_id FROM movie_genres WHERE genre_id = $1")
            .bind(genre_id)
            .fetch_all(&self.pool)
            .await
            .db_context("fetching movies by genre")
    }

    async fn find_movie(&self, movie_id: &str) -> AppResult<Option<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as(&sql)
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await
            .db_context("fetching movie by ID")
    }

    async fn movie_genre_links(&self, movie_id: &str) -> AppResult<Vec<Option<LinkedGenre>>> {
        let rows: Vec<GenreLinkRow> = sqlx::query_as(
            "SELECT g.id AS genre_id, g.name AS genre_name \
             FROM movie_genres mg \
             LEFT JOIN genres g ON g.id = mg.genre_id \
             WHERE mg.movie_id = $1 \
             ORDER BY mg.created_at, mg.genre_id",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
        .db_context("fetching genres of movie")?;

        Ok(rows
            .into_iter()
            .map(|row| match (row.genre_id, row.genre_name) {
                (None, None) => None,
                (id, name) => Some(LinkedGenre { id, name }),
            })
            .collect())
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        sqlx::query_as("SELECT id, name, created_at FROM genres ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .db_context("fetching genres")
    }

    async fn genre_ids_for_movie(&self, movie_id: &str) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT genre_id FROM movie_genres WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_all(&self.pool)
            .await
            .db_context(format!("fetching genres for movie ID {}", movie_id))
    }

    async fn links_sharing_genres(
        &self,
        genre_ids: &[String],
        exclude_movie_id: &str,
    ) -> AppResult<Vec<MovieGenre>> {
        sqlx::query_as(
            "SELECT movie_id, genre_id, created_at FROM movie_genres \
             WHERE genre_id = ANY($1) AND movie_id <> $2 \
             ORDER BY created_at, movie_id",
        )
        .bind(genre_ids)
        .bind(exclude_movie_id)
        .fetch_all(&self.pool)
        .await
        .db_context("fetching movies by genres")
    }

    async fn movies_by_ids(&self, movie_ids: &[String]) -> AppResult<Vec<Movie>> {
        let sql = format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ANY($1)");
        sqlx::query_as(&sql)
            .bind(movie_ids)
            .fetch_all(&self.pool)
            .await
            .db_context("fetching recommended movies")
    }

    async fn upsert_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<Favorite>> {
        // DO UPDATE rather than DO NOTHING so an existing row is still returned
        sqlx::query_as(
            "INSERT INTO favorites (user_id, movie_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, movie_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING user_id, movie_id, created_at",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await
        .db_context("updating favorites")
    }

    async fn favorites_with_movies(&self, user_id: &str) -> AppResult<Vec<FavoriteMovie>> {
        let sql = format!(
            "SELECT f.movie_id AS favorite_movie_id, {JOINED_MOVIE_COLUMNS} \
             FROM favorites f \
             LEFT JOIN movies m ON m.id = f.movie_id \
             WHERE f.user_id = $1 \
             ORDER BY f.created_at, f.movie_id"
        );

        let rows: Vec<FavoriteMovieRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .db_context("fetching favorites")?;

        Ok(rows
            .into_iter()
            .map(|row| FavoriteMovie {
                movie_id: row.favorite_movie_id,
                movie: row.movie.into_movie(),
            })
            .collect())
    }

    async fn categories_by_ids(&self, category_ids: &[String]) -> AppResult<Vec<Category>> {
        sqlx::query_as(
            "SELECT id, name, created_at FROM categories WHERE id = ANY($1) \
             ORDER BY created_at, id",
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await
        .db_context("fetching categories")
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let sql = format!(
            "INSERT INTO movies (title, rating, release_date, category_id, trailer_url, \
                                 horizontal_image, vertical_image_small, vertical_image_large) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {MOVIE_COLUMNS}"
        );

        sqlx::query_as(&sql)
            .bind(movie.title)
            .bind(movie.rating)
            .bind(movie.release_date)
            .bind(movie.category_id)
            .bind(movie.trailer_url)
            .bind(movie.horizontal_image)
            .bind(movie.vertical_image_small)
            .bind(movie.vertical_image_large)
            .fetch_one(&self.pool)
            .await
            .db_context("creating movie record")
    }

    async fn insert_profile(&self, profile_id: &str) -> AppResult<Profile> {
        sqlx::query_as("INSERT INTO profiles (id) VALUES ($1) RETURNING id, created_at")
            .bind(profile_id)
            .fetch_one(&self.pool)
            .await
            .db_context("creating user profile")
    }

    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as("SELECT id, created_at FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
            .db_context("fetching user profile")
    }
}
