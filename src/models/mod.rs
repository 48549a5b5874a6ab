mod auth;
mod catalog;
mod movie_view;
mod tmdb;

pub use auth::*;
pub use catalog::*;
pub use movie_view::*;
pub use tmdb::*;
