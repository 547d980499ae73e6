use crate::models::ShortLink;
use crate::storage::{InsertOutcome, Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS urls (
                id BIGSERIAL PRIMARY KEY,
                original_url TEXT NOT NULL UNIQUE,
                short_code TEXT NOT NULL UNIQUE,
                created_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn get_by_url(&self, original_url: &str) -> StorageResult<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT original_url, short_code
            FROM urls
            WHERE original_url = $1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn get_by_code(&self, short_code: &str) -> StorageResult<Option<ShortLink>> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT original_url, short_code
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn insert(&self, original_url: &str, short_code: &str) -> StorageResult<InsertOutcome> {
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| StorageError::Other(e.into()))?
            .as_secs() as i64;

        let inserted = sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO urls (original_url, short_code, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING original_url, short_code
            "#,
        )
        .bind(original_url)
        .bind(short_code)
        .bind(created_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some(link) = inserted {
            return Ok(InsertOutcome::Inserted(link));
        }

        match self.get_by_url(original_url).await? {
            Some(existing) => Ok(InsertOutcome::UrlTaken(existing)),
            None => Ok(InsertOutcome::CodeTaken),
        }
    }

    async fn count(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
