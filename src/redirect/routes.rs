use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

use super::handlers::{not_found, redirect_url};

pub fn create_redirect_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/404", get(not_found))
        .route("/{code}", get(redirect_url))
        .with_state(state)
}
