//! External collaborator abstractions
//!
//! Each hosted service the catalog talks to (popular-movies feed, object
//! storage, identity provider) sits behind a trait so the HTTP clients can be
//! swapped for in-memory doubles in tests.
use crate::{
    error::AppResult,
    models::{CategoryGroup, Session},
};

pub mod supabase_auth;
pub mod supabase_storage;
pub mod tmdb;

pub use supabase_auth::SupabaseAuthProvider;
pub use supabase_storage::SupabaseStorage;
pub use tmdb::TmdbProvider;

/// Upstream feed of currently popular movies
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PopularMoviesProvider: Send + Sync {
    /// Fetches the first page of the popular listing, mapped to catalog views
    async fn popular_movies(&self) -> AppResult<CategoryGroup>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Binary artwork storage
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ImageStorage: Send + Sync {
    /// Uploads (or overwrites) `bytes` at `path` and returns its public URL
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String>;
}

/// Hosted identity provider owning credentials and sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Registers the credentials and returns the new user id
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<String>;

    /// Exchanges credentials for a session
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;
}
