use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::borrow::Cow;
use std::fmt::Write;
use std::sync::Arc;

use crate::api::static_files::{not_found_page, serve_static};
use crate::error::ApiError;
use crate::shortcode::is_short_code;
use crate::state::AppState;

/// Redirect to original URL
pub async fn redirect_url(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    // Single-segment paths that cannot be codes are static assets
    if !is_short_code(&code) {
        return serve_static(&code, state.static_dir.as_deref()).await;
    }

    match state.shortener.resolve(&code).await {
        Ok(Some(link)) => redirect_to(state.redirect_status, &link.original_url)
            .unwrap_or_else(|e| e.into_response()),
        Ok(None) => {
            tracing::debug!(short_code = %code, "short code not found");
            not_found_page(state.static_dir.as_deref()).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// The not-found page
pub async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    not_found_page(state.static_dir.as_deref()).await
}

fn redirect_to(status: StatusCode, location: &str) -> Result<Response, RedirectError> {
    let location =
        HeaderValue::from_str(&escape_non_ascii(location)).map_err(|_| RedirectError)?;

    let mut response = (status, [(header::LOCATION, location)]).into_response();
    if status != StatusCode::MOVED_PERMANENTLY {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
    Ok(response)
}

/// Percent-encode bytes outside ASCII so the header stays plain ASCII.
fn escape_non_ascii(location: &str) -> Cow<'_, str> {
    if location.is_ascii() {
        return Cow::Borrowed(location);
    }

    let mut escaped = String::with_capacity(location.len() + 16);
    for byte in location.bytes() {
        if byte.is_ascii() {
            escaped.push(byte as char);
        } else {
            let _ = write!(escaped, "%{byte:02X}");
        }
    }
    Cow::Owned(escaped)
}

/// A stored URL that cannot be placed in a `Location` header.
#[derive(Debug)]
struct RedirectError;

impl IntoResponse for RedirectError {
    fn into_response(self) -> Response {
        tracing::error!("stored URL is not a valid header value");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(crate::error::ErrorResponse::new("Internal server error")),
        )
            .into_response()
    }
}
