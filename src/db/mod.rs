pub mod postgres;
pub mod store;

pub use postgres::{create_pool, run_migrations, PgCatalogStore};
pub use store::CatalogStore;

#[cfg(test)]
pub use store::MockCatalogStore;
