use crate::models::ShortLink;
use crate::storage::{InsertOutcome, Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Mappings {
    by_url: HashMap<String, String>,
    by_code: HashMap<String, String>,
}

/// Process-local storage. Both directions live behind one lock so an insert
/// can never leave them out of step.
#[derive(Default)]
pub struct MemoryStorage {
    mappings: RwLock<Mappings>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get_by_url(&self, original_url: &str) -> StorageResult<Option<ShortLink>> {
        let mappings = self.mappings.read().await;
        Ok(mappings
            .by_url
            .get(original_url)
            .map(|code| ShortLink::new(original_url, code.as_str())))
    }

    async fn get_by_code(&self, short_code: &str) -> StorageResult<Option<ShortLink>> {
        let mappings = self.mappings.read().await;
        Ok(mappings
            .by_code
            .get(short_code)
            .map(|url| ShortLink::new(url.as_str(), short_code)))
    }

    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<InsertOutcome> {
        let mut mappings = self.mappings.write().await;

        if let Some(existing) = mappings.by_url.get(original_url) {
            return Ok(InsertOutcome::UrlTaken(ShortLink::new(
                original_url,
                existing.as_str(),
            )));
        }
        if mappings.by_code.contains_key(short_code) {
            return Ok(InsertOutcome::CodeTaken);
        }

        mappings
            .by_url
            .insert(original_url.to_string(), short_code.to_string());
        mappings
            .by_code
            .insert(short_code.to_string(), original_url.to_string());

        Ok(InsertOutcome::Inserted(ShortLink::new(
            original_url,
            short_code,
        )))
    }

    async fn count(&self) -> StorageResult<i64> {
        Ok(self.mappings.read().await.by_code.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_and_lookup_both_directions() {
        let storage = MemoryStorage::new();

        let outcome = storage.insert("https://example.com", "abc12").await.unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::Inserted(ShortLink::new("https://example.com", "abc12"))
        );

        let by_code = storage.get_by_code("abc12").await.unwrap().unwrap();
        assert_eq!(by_code.original_url, "https://example.com");

        let by_url = storage
            .get_by_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_url.short_code, "abc12");

        assert!(storage.get_by_code("zzzzz").await.unwrap().is_none());
        assert!(storage.get_by_url("https://other.com").await.unwrap().is_none());
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_taken_code() {
        let storage = MemoryStorage::new();
        storage.insert("https://a.example", "abc12").await.unwrap();

        let outcome = storage.insert("https://b.example", "abc12").await.unwrap();
        assert_eq!(outcome, InsertOutcome::CodeTaken);

        // The losing URL must not be half-stored
        assert!(storage.get_by_url("https://b.example").await.unwrap().is_none());
        assert_eq!(
            storage.get_by_code("abc12").await.unwrap().unwrap().original_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn test_insert_returns_existing_link_for_taken_url() {
        let storage = MemoryStorage::new();
        storage.insert("https://a.example", "abc12").await.unwrap();

        let outcome = storage.insert("https://a.example", "xyz89").await.unwrap();
        assert_eq!(
            outcome,
            InsertOutcome::UrlTaken(ShortLink::new("https://a.example", "abc12"))
        );
        assert!(storage.get_by_code("xyz89").await.unwrap().is_none());
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_code_store_one_mapping() {
        let storage = Arc::new(MemoryStorage::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move {
                    storage
                        .insert(&format!("https://example.com/{i}"), "same1")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if let InsertOutcome::Inserted(_) = handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(storage.count().await.unwrap(), 1);
    }
}
