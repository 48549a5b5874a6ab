use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Error {context}: {source}")]
    DataAccess {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Mutation did not apply: {0}")]
    MutationNotApplied(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DataAccess { .. }
            | AppError::MutationNotApplied(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed with server error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) | AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Upstream collaborator failed");
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::HttpClient(_) => {
                tracing::error!(error = %self, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attaches the failing operation to a raw `sqlx` error
pub trait DbContext<T> {
    fn db_context(self, context: impl Into<String>) -> AppResult<T>;
}

impl<T> DbContext<T> for Result<T, sqlx::Error> {
    fn db_context(self, context: impl Into<String>) -> AppResult<T> {
        self.map_err(|source| AppError::DataAccess {
            context: context.into(),
            source,
        })
    }
}
