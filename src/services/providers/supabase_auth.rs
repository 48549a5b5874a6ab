//! Supabase Auth (GoTrue) identity provider
//!
//! Only forwards credentials; password storage and verification stay with
//! the hosted service.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{AppError, AppResult},
    models::Session,
    services::providers::IdentityProvider,
};

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

/// Sign-up returns the bare user when email confirmation is enabled and a
/// session wrapper otherwise.
#[derive(Debug, Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
}

impl SignUpResponse {
    fn user_id(self) -> Option<String> {
        self.user.map(|user| user.id).or(self.id)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Clone)]
pub struct SupabaseAuthProvider {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl SupabaseAuthProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for SupabaseAuthProvider {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InvalidInput(format!(
                "Error registering user: status {}: {}",
                status, body
            )));
        }

        let signed_up: SignUpResponse = response.json().await?;
        signed_up.user_id().ok_or_else(|| {
            AppError::InvalidInput("User registration failed. No user data returned.".to_string())
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let response = self
            .http_client
            .post(format!("{}/auth/v1/token", self.base_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Unauthorized(format!(
                "Error logging in: status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;

        Ok(Session {
            access_token: token.access_token,
            user_id: token.user.id,
        })
    }
}
