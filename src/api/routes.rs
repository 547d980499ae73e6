use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::state::AppState;

use super::handlers::{fallback, health_check, home, shorten_url};

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/shorten", post(shorten_url))
        .route("/health", get(health_check))
        .fallback(fallback)
        .with_state(state)
}
