pub mod catalog;
pub mod favorites;
pub mod identity;
pub mod ingest;
pub mod popular;
pub mod providers;
pub mod recommendations;
