//! Short code allocation.
//!
//! [`Shortener::shorten`] is the only path that creates links. It answers
//! idempotently for URLs that are already mapped and otherwise draws random
//! candidates until one is stored, up to a fixed number of attempts. The
//! pre-check against the store only saves a write; uniqueness comes from the
//! store's insert-if-absent.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::ShortLink;
use crate::shortcode::GenerateCode;
use crate::storage::{InsertOutcome, Storage, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenOutcome {
    /// A new link was stored for this request.
    Created(ShortLink),
    /// The URL was already mapped; the existing link is returned.
    Existing(ShortLink),
}

impl ShortenOutcome {
    pub fn link(&self) -> &ShortLink {
        match self {
            Self::Created(link) | Self::Existing(link) => link,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("failed to allocate code after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub struct Shortener {
    storage: Arc<dyn Storage>,
    generator: Arc<dyn GenerateCode>,
    max_attempts: u32,
}

impl Shortener {
    pub fn new(
        storage: Arc<dyn Storage>,
        generator: Arc<dyn GenerateCode>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            generator,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Return the link for `original_url`, creating one if needed.
    ///
    /// `original_url` must already be validated.
    pub async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome, ShortenError> {
        if let Some(existing) = self.storage.get_by_url(original_url).await? {
            debug!(short_code = %existing.short_code, "URL already shortened");
            return Ok(ShortenOutcome::Existing(existing));
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate_code();

            if self.storage.get_by_code(&candidate).await?.is_some() {
                warn!(short_code = %candidate, attempt, "generated code already exists, retrying");
                continue;
            }

            match self.storage.insert(original_url, &candidate).await? {
                InsertOutcome::Inserted(link) => {
                    info!(short_code = %link.short_code, attempt, "created short link");
                    return Ok(ShortenOutcome::Created(link));
                }
                InsertOutcome::UrlTaken(existing) => {
                    debug!(
                        short_code = %existing.short_code,
                        "URL was shortened concurrently, returning existing link"
                    );
                    return Ok(ShortenOutcome::Existing(existing));
                }
                InsertOutcome::CodeTaken => {
                    warn!(
                        short_code = %candidate,
                        attempt,
                        "code claimed concurrently during insert, retrying"
                    );
                }
            }
        }

        error!(
            attempts = self.max_attempts,
            "exhausted attempts to allocate a unique short code"
        );
        Err(ShortenError::Exhausted {
            attempts: self.max_attempts,
        })
    }

    /// Resolve a short code to its link.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<ShortLink>, ShortenError> {
        Ok(self.storage.get_by_code(short_code).await?)
    }
}
