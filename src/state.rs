use axum::http::StatusCode;
use std::sync::Arc;

use crate::config::{Config, RedirectMode, ShortenerConfig};
use crate::shortcode::{GenerateCode, RandomCodeGenerator};
use crate::shortener::Shortener;
use crate::storage::Storage;

/// Shared state handed to every handler.
pub struct AppState {
    pub shortener: Shortener,
    pub base_url: String,
    pub redirect_status: StatusCode,
    /// Serve pages from this directory instead of the embedded copies
    pub static_dir: Option<String>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, base_url: impl Into<String>) -> Self {
        Self {
            shortener: Shortener::new(
                storage,
                Arc::new(RandomCodeGenerator),
                ShortenerConfig::default_max_attempts(),
            ),
            base_url: base_url.into(),
            redirect_status: RedirectMode::Found.status_code(),
            static_dir: None,
        }
    }

    pub fn from_config(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            shortener: Shortener::new(
                storage,
                Arc::new(RandomCodeGenerator),
                config.shortener.max_attempts,
            ),
            base_url: config.base_url.clone(),
            redirect_status: config.redirect_status.status_code(),
            static_dir: config.frontend.static_dir.clone(),
        }
    }

    pub fn with_redirect_mode(mut self, mode: RedirectMode) -> Self {
        self.redirect_status = mode.status_code();
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn GenerateCode>, max_attempts: u32) -> Self {
        let storage = Arc::clone(self.shortener.storage());
        self.shortener = Shortener::new(storage, generator, max_attempts);
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<String>) -> Self {
        self.static_dir = Some(static_dir.into());
        self
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        self.shortener.storage()
    }

    /// Public URL for a short code
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), short_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_short_url_joins_with_single_slash() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

        let state = AppState::new(storage.clone(), "http://localhost:8080/");
        assert_eq!(state.short_url("abcde"), "http://localhost:8080/abcde");

        let state = AppState::new(storage, "https://sho.rt");
        assert_eq!(state.short_url("abcde"), "https://sho.rt/abcde");
    }
}
