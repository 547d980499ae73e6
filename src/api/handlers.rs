use axum::{
    extract::{rejection::JsonRejection, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::static_files::serve_static;
use crate::error::ApiError;
use crate::models::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use crate::validation::validate_url;

/// Shorten a URL, reusing the existing code when the URL is already known
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortenResponse>), ApiError> {
    let Json(payload) = payload?;

    let original_url = validate_url(&payload.url).ok_or(ApiError::InvalidUrl)?;

    let outcome = state.shortener.shorten(original_url).await?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let link = outcome.link();
    Ok((
        status,
        Json(ShortenResponse {
            original_url: link.original_url.clone(),
            short_url: state.short_url(&link.short_code),
        }),
    ))
}

/// Landing page
pub async fn home(State(state): State<Arc<AppState>>) -> Response {
    serve_static("/", state.static_dir.as_deref()).await
}

/// Static assets, or the not-found page for anything else
pub async fn fallback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    serve_static(uri.path(), state.static_dir.as_deref()).await
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    #[derive(Serialize)]
    struct HealthResponse {
        status: &'static str,
        links: i64,
    }

    match state.storage().count().await {
        Ok(links) => Json(HealthResponse {
            status: "ok",
            links,
        })
        .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
