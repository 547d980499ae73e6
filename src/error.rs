use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::shortener::ShortenError;
use crate::storage::StorageError;

/// Errors surfaced by the JSON endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON payload")]
    InvalidJson(#[from] JsonRejection),
    #[error("Invalid URL provided")]
    InvalidUrl,
    #[error(transparent)]
    Shorten(#[from] ShortenError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Shorten(ShortenError::Storage(err))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Client errors are expected and not logged; internal ones keep their
        // details in the log only.
        let (status, message) = match &self {
            ApiError::InvalidJson(rejection) => {
                tracing::debug!(error = %rejection, "rejected shorten payload");
                (StatusCode::BAD_REQUEST, "Invalid JSON payload")
            }
            ApiError::InvalidUrl => (StatusCode::BAD_REQUEST, "Invalid URL provided"),
            ApiError::Shorten(ShortenError::Exhausted { attempts }) => {
                warn!(attempts, "short code space looks crowded");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate short URL code",
                )
            }
            ApiError::Shorten(ShortenError::Storage(e)) => {
                error!(error = ?e, "storage error while handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
