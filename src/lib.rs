pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod redirect;
pub mod shortcode;
pub mod shortener;
pub mod startup;
pub mod state;
pub mod storage;
pub mod validation;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use state::AppState;

/// The full application: shorten API, redirects and static pages.
pub fn build_router(state: Arc<AppState>) -> Router {
    api::routes::create_api_router(Arc::clone(&state))
        .merge(redirect::routes::create_redirect_router(state))
        .layer(TraceLayer::new_for_http())
}
