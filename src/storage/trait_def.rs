use crate::models::ShortLink;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Other(err.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Result of an insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The mapping was stored.
    Inserted(ShortLink),
    /// The code already belongs to some URL; nothing was stored.
    CodeTaken,
    /// The URL was already mapped, possibly by a concurrent request.
    UrlTaken(ShortLink),
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Look up the link for an original URL
    async fn get_by_url(&self, original_url: &str) -> StorageResult<Option<ShortLink>>;

    /// Look up the link for a short code
    async fn get_by_code(&self, short_code: &str) -> StorageResult<Option<ShortLink>>;

    /// Store `original_url -> short_code` unless either side is already mapped
    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<InsertOutcome>;

    /// Number of stored links
    async fn count(&self) -> StorageResult<i64>;

    /// Release connections. Called once after the server has drained.
    async fn close(&self) {}
}
