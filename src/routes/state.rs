use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::{
    config::Config,
    db::{CatalogStore, PgCatalogStore},
    error::AppResult,
    services::providers::{
        IdentityProvider, ImageStorage, PopularMoviesProvider, SupabaseAuthProvider,
        SupabaseStorage, TmdbProvider,
    },
};

/// Shared application state
///
/// Built once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub popular_provider: Arc<dyn PopularMoviesProvider>,
    pub image_storage: Arc<dyn ImageStorage>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        popular_provider: Arc<dyn PopularMoviesProvider>,
        image_storage: Arc<dyn ImageStorage>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            store,
            popular_provider,
            image_storage,
            identity,
        }
    }

    /// Wires the production collaborators from configuration
    pub fn from_config(config: &Config, pool: PgPool) -> AppResult<Self> {
        let popular_provider = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base_url.clone(),
            Duration::from_secs(config.tmdb_timeout_secs),
            config.tmdb_max_redirects,
        )?;

        let image_storage = SupabaseStorage::new(
            config.supabase_url.clone(),
            config.supabase_service_key.clone(),
            config.storage_bucket.clone(),
        );

        let identity = SupabaseAuthProvider::new(
            config.supabase_url.clone(),
            config.supabase_service_key.clone(),
        );

        Ok(Self::new(
            Arc::new(PgCatalogStore::new(pool)),
            Arc::new(popular_provider),
            Arc::new(image_storage),
            Arc::new(identity),
        ))
    }
}
