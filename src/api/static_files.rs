use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use mime_guess::from_path;
use rust_embed::RustEmbed;
use std::path::{Component, Path, PathBuf};

#[derive(RustEmbed)]
#[folder = "static"]
pub struct Assets;

pub const INDEX_PAGE: &str = "index.html";
pub const NOT_FOUND_PAGE: &str = "notFound.html";

/// Serve a static file from `static_dir` if given, falling back to the
/// embedded assets. Returns `None` when neither has it.
pub async fn load_static(path: &str, static_dir: Option<&str>) -> Option<Response> {
    let path = path.trim_start_matches('/');
    let path = if path.is_empty() { INDEX_PAGE } else { path };

    if !is_safe_path(path) {
        return None;
    }

    // Try to serve from filesystem if static_dir is provided
    if let Some(dir) = static_dir {
        let file_path = PathBuf::from(dir).join(path);
        if let Ok(content) = tokio::fs::read(&file_path).await {
            return Some(file_response(StatusCode::OK, path, Body::from(content)));
        }
    }

    Assets::get(path).map(|content| file_response(StatusCode::OK, path, Body::from(content.data)))
}

/// A static asset, or the not-found page when there is none.
pub async fn serve_static(path: &str, static_dir: Option<&str>) -> Response {
    match load_static(path, static_dir).await {
        Some(asset) => asset,
        None => not_found_page(static_dir).await,
    }
}

/// The not-found page, always with a 404 status.
pub async fn not_found_page(static_dir: Option<&str>) -> Response {
    match load_static(NOT_FOUND_PAGE, static_dir).await {
        Some(page) => {
            let (mut parts, body) = page.into_parts();
            parts.status = StatusCode::NOT_FOUND;
            Response::from_parts(parts, body)
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

fn file_response(status: StatusCode, path: &str, body: Body) -> Response {
    let mime = from_path(path).first_or_octet_stream();
    (status, [(header::CONTENT_TYPE, mime.as_ref().to_string())], body).into_response()
}

/// Reject paths that could escape the static directory.
fn is_safe_path(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
}
