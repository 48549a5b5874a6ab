//! TMDB popular-movies provider
//!
//! Reads page 1 of `/movie/popular` and maps it into the same view shape the
//! catalog uses. The client carries a bounded timeout and redirect policy;
//! anything beyond those is a transport error and is not retried.
use std::time::Duration;

use reqwest::{redirect, Client as HttpClient};

use crate::{
    error::{AppError, AppResult},
    models::{CategoryGroup, TmdbPage},
    services::providers::PopularMoviesProvider,
};

pub const POPULAR_FEED_NAME: &str = "TMDB Popular Movies";
const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_base_url: String,
        timeout: Duration,
        max_redirects: usize,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(max_redirects))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            image_base_url,
        })
    }

    fn map_page(&self, page: TmdbPage) -> CategoryGroup {
        CategoryGroup {
            name: POPULAR_FEED_NAME.to_string(),
            movies: page
                .results
                .into_iter()
                .map(|movie| movie.into_view(&self.image_base_url))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl PopularMoviesProvider for TmdbProvider {
    async fn popular_movies(&self) -> AppResult<CategoryGroup> {
        let url = format!("{}/movie/popular", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", LANGUAGE),
                ("page", "1"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let page: TmdbPage = response.json().await?;
        let group = self.map_page(page);

        tracing::info!(
            results = group.movies.len(),
            provider = self.name(),
            "Popular movies fetched"
        );

        Ok(group)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
