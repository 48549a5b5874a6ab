//! Supabase Storage backend for movie artwork
//!
//! Uploads go to `POST /storage/v1/object/{bucket}/{path}` with `x-upsert`
//! so re-uploading the same file name overwrites it. Public URLs follow the
//! `/storage/v1/object/public/{bucket}/{path}` layout. Every path segment is
//! percent-encoded, so file names may carry `#`, `?` or `%`.
use reqwest::{Client as HttpClient, Url};

use crate::{
    error::{AppError, AppResult},
    services::providers::ImageStorage,
};

const CACHE_CONTROL: &str = "max-age=3600";

#[derive(Clone)]
pub struct SupabaseStorage {
    http_client: HttpClient,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    fn object_url(&self, path: &str) -> AppResult<Url> {
        self.storage_url(&["storage", "v1", "object"], path)
    }

    fn public_url(&self, path: &str) -> AppResult<Url> {
        self.storage_url(&["storage", "v1", "object", "public"], path)
    }

    fn storage_url(&self, prefix: &[&str], path: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::Storage(format!("Invalid storage URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| AppError::Storage("Storage URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(prefix)
            .push(&self.bucket)
            .extend(path.split('/'));

        Ok(url)
    }
}

#[async_trait::async_trait]
impl ImageStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<String> {
        let size = bytes.len();

        let response = self
            .http_client
            .post(self.object_url(path)?)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Failed to upload {}: status {}: {}",
                path, status, body
            )));
        }

        tracing::debug!(path = %path, bytes = size, bucket = %self.bucket, "Image uploaded");

        Ok(self.public_url(path)?.to_string())
    }
}
