#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};

use cinecat_api::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{
        Category, CategoryGroup, CategoryWithMovies, Favorite, FavoriteMovie, Genre, LinkedGenre,
        Movie, MovieGenre, MovieView, NewMovie, Profile, Session,
    },
    routes::AppState,
    services::providers::{IdentityProvider, ImageStorage, PopularMoviesProvider},
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    genres: Vec<Genre>,
    movies: Vec<Movie>,
    movie_genres: Vec<MovieGenre>,
    favorites: Vec<Favorite>,
    profiles: Vec<Profile>,
}

/// In-memory catalog keeping insertion order as the store order
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn add_category(&self, id: &str, name: &str) {
        self.tables.lock().unwrap().categories.push(Category {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        });
    }

    pub fn add_genre(&self, id: &str, name: &str) {
        self.tables.lock().unwrap().genres.push(Genre {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        });
    }

    pub fn add_movie(&self, id: &str, category_id: Option<&str>, rating: Option<f64>) {
        self.tables.lock().unwrap().movies.push(Movie {
            id: id.to_string(),
            title: format!("Movie {}", id),
            rating,
            release_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            category_id: category_id.map(str::to_string),
            horizontal_image: None,
            vertical_image_small: None,
            vertical_image_large: Some(format!("https://cdn.test/{}.jpg", id)),
            trailer_url: None,
            created_at: Utc::now(),
        });
    }

    pub fn link(&self, movie_id: &str, genre_id: &str) {
        self.tables.lock().unwrap().movie_genres.push(MovieGenre {
            movie_id: movie_id.to_string(),
            genre_id: genre_id.to_string(),
            created_at: Utc::now(),
        });
    }

    pub fn favorite_count(&self, user_id: &str, movie_id: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id && f.movie_id == movie_id)
            .count()
    }

    pub fn movies(&self) -> Vec<Movie> {
        self.tables.lock().unwrap().movies.clone()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.tables.lock().unwrap().profiles.clone()
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryStore {
    async fn favorite_movie_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.movie_id.clone())
            .collect())
    }

    async fn categories_with_movies(&self) -> AppResult<Vec<CategoryWithMovies>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter()
            .map(|category| CategoryWithMovies {
                category: category.clone(),
                movies: tables
                    .movies
                    .iter()
                    .filter(|m| m.category_id.as_deref() == Some(category.id.as_str()))
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn movie_ids_with_genre(&self, genre_id: &str) -> AppResult<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .movie_genres
            .iter()
            .filter(|l| l.genre_id == genre_id)
            .map(|l| l.movie_id.clone())
            .collect())
    }

    async fn find_movie(&self, movie_id: &str) -> AppResult<Option<Movie>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.movies.iter().find(|m| m.id == movie_id).cloned())
    }

    async fn movie_genre_links(&self, movie_id: &str) -> AppResult<Vec<Option<LinkedGenre>>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .movie_genres
            .iter()
            .filter(|l| l.movie_id == movie_id)
            .map(|l| {
                tables
                    .genres
                    .iter()
                    .find(|g| g.id == l.genre_id)
                    .map(|g| LinkedGenre {
                        id: Some(g.id.clone()),
                        name: Some(g.name.clone()),
                    })
            })
            .collect())
    }

    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.tables.lock().unwrap().genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn genre_ids_for_movie(&self, movie_id: &str) -> AppResult<Vec<String>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .movie_genres
            .iter()
            .filter(|l| l.movie_id == movie_id)
            .map(|l| l.genre_id.clone())
            .collect())
    }

    async fn links_sharing_genres(
        &self,
        genre_ids: &[String],
        exclude_movie_id: &str,
    ) -> AppResult<Vec<MovieGenre>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .movie_genres
            .iter()
            .filter(|l| genre_ids.contains(&l.genre_id) && l.movie_id != exclude_movie_id)
            .cloned()
            .collect())
    }

    async fn movies_by_ids(&self, movie_ids: &[String]) -> AppResult<Vec<Movie>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .movies
            .iter()
            .filter(|m| movie_ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn upsert_favorite(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<Favorite>> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.movie_id == movie_id)
        {
            return Ok(Some(existing.clone()));
        }

        let favorite = Favorite {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
            created_at: Utc::now(),
        };
        tables.favorites.push(favorite.clone());
        Ok(Some(favorite))
    }

    async fn favorites_with_movies(&self, user_id: &str) -> AppResult<Vec<FavoriteMovie>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| FavoriteMovie {
                movie_id: f.movie_id.clone(),
                movie: tables.movies.iter().find(|m| m.id == f.movie_id).cloned(),
            })
            .collect())
    }

    async fn categories_by_ids(&self, category_ids: &[String]) -> AppResult<Vec<Category>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .categories
            .iter()
            .filter(|c| category_ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let mut tables = self.tables.lock().unwrap();
        let stored = Movie {
            id: format!("movie-{}", tables.movies.len() + 1),
            title: movie.title,
            rating: movie.rating,
            release_date: movie.release_date,
            category_id: movie.category_id,
            horizontal_image: movie.horizontal_image,
            vertical_image_small: movie.vertical_image_small,
            vertical_image_large: movie.vertical_image_large,
            trailer_url: movie.trailer_url,
            created_at: Utc::now(),
        };
        tables.movies.push(stored.clone());
        Ok(stored)
    }

    async fn insert_profile(&self, profile_id: &str) -> AppResult<Profile> {
        let profile = Profile {
            id: profile_id.to_string(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, profile_id: &str) -> AppResult<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.id == profile_id).cloned())
    }
}

/// Feed returning a fixed list, or an upstream fault when `fail` is set
pub struct StaticFeed {
    pub movies: Vec<MovieView>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl PopularMoviesProvider for StaticFeed {
    async fn popular_movies(&self) -> AppResult<CategoryGroup> {
        if self.fail {
            return Err(AppError::ExternalApi(
                "TMDB API returned status 503 Service Unavailable".to_string(),
            ));
        }
        Ok(CategoryGroup {
            name: "TMDB Popular Movies".to_string(),
            movies: self.movies.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Storage that records uploaded paths and serves them from a fake CDN
#[derive(Default)]
pub struct RecordingStorage {
    pub uploaded: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ImageStorage for RecordingStorage {
    async fn upload(&self, path: &str, _bytes: Vec<u8>, _content_type: &str) -> AppResult<String> {
        self.uploaded.lock().unwrap().push(path.to_string());
        Ok(format!("https://cdn.test/{}", path))
    }
}

/// Identity provider accepting a single password
pub struct FakeIdentity;

pub const VALID_PASSWORD: &str = "correct horse";

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_up(&self, email: &str, _password: &str) -> AppResult<String> {
        Ok(format!("user:{}", email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        if password != VALID_PASSWORD {
            return Err(AppError::Unauthorized(
                "Error logging in: Invalid login credentials".to_string(),
            ));
        }
        Ok(Session {
            access_token: "access-token".to_string(),
            user_id: format!("user:{}", email),
        })
    }
}

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub storage: Arc<RecordingStorage>,
    pub state: Arc<AppState>,
}

pub fn test_context(feed: StaticFeed) -> TestContext {
    let store = Arc::new(InMemoryStore::default());
    let storage = Arc::new(RecordingStorage::default());
    let state = AppState::new(
        store.clone(),
        Arc::new(feed),
        storage.clone(),
        Arc::new(FakeIdentity),
    );

    TestContext {
        store,
        storage,
        state: Arc::new(state),
    }
}
