use crate::models::ShortLink;
use crate::storage::{InsertOutcome, Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;

/// Read-through cache in front of a persistent storage.
///
/// Links never change once created, so cached hits cannot go stale. Misses
/// are not cached because the link may be created a moment later.
pub struct CachedStorage {
    /// Underlying storage implementation
    inner: Arc<dyn Storage>,
    /// short_code -> link
    by_code: Cache<String, ShortLink>,
    /// original_url -> link
    by_url: Cache<String, ShortLink>,
}

impl CachedStorage {
    pub fn new(inner: Arc<dyn Storage>, max_cache_entries: u64) -> Self {
        Self {
            inner,
            by_code: Cache::builder().max_capacity(max_cache_entries).build(),
            by_url: Cache::builder().max_capacity(max_cache_entries).build(),
        }
    }

    async fn remember(&self, link: &ShortLink) {
        self.by_code
            .insert(link.short_code.clone(), link.clone())
            .await;
        self.by_url
            .insert(link.original_url.clone(), link.clone())
            .await;
    }
}

#[async_trait]
impl Storage for CachedStorage {
    async fn init(&self) -> Result<()> {
        self.inner.init().await
    }

    async fn get_by_url(&self, original_url: &str) -> StorageResult<Option<ShortLink>> {
        if let Some(cached) = self.by_url.get(original_url).await {
            return Ok(Some(cached));
        }

        let result = self.inner.get_by_url(original_url).await?;
        if let Some(link) = &result {
            self.remember(link).await;
        }
        Ok(result)
    }

    async fn get_by_code(&self, short_code: &str) -> StorageResult<Option<ShortLink>> {
        if let Some(cached) = self.by_code.get(short_code).await {
            return Ok(Some(cached));
        }

        // Cache miss - fetch from underlying storage
        let result = self.inner.get_by_code(short_code).await?;
        if let Some(link) = &result {
            self.remember(link).await;
        }
        Ok(result)
    }

    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<InsertOutcome> {
        let outcome = self.inner.insert(original_url, short_code).await?;

        match &outcome {
            InsertOutcome::Inserted(link) | InsertOutcome::UrlTaken(link) => {
                self.remember(link).await;
            }
            InsertOutcome::CodeTaken => {}
        }

        Ok(outcome)
    }

    async fn count(&self) -> StorageResult<i64> {
        self.inner.count().await
    }

    async fn close(&self) {
        self.by_code.invalidate_all();
        self.by_url.invalidate_all();
        self.inner.close().await;
    }
}
