use anyhow::{bail, Context};
use axum::http::StatusCode;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    /// Prefix used to build the `shortURL` returned by `POST /shorten`
    pub base_url: String,
    pub redirect_status: RedirectMode,
    pub shortener: ShortenerConfig,
    pub cache: CacheConfig,
    pub frontend: FrontendConfig,
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    /// 302 Found
    Found,
    /// 301 Moved Permanently
    Permanent,
}

#[derive(Debug, Clone)]
pub struct ShortenerConfig {
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Zero disables the read cache
    pub max_entries: u64,
}

#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Path to directory containing the landing and not-found pages
    /// If None, uses the embedded copies
    pub static_dir: Option<String>,
}

impl StorageBackend {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!(
                "Unknown STORAGE_BACKEND '{other}'. Supported values: memory, sqlite, postgres"
            ),
        }
    }

    pub fn is_persistent(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

impl RedirectMode {
    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_lowercase().as_str() {
            "302" | "found" | "temporary" => Ok(Self::Found),
            "301" | "permanent" | "moved" => Ok(Self::Permanent),
            other => bail!("Unknown REDIRECT_STATUS '{other}'. Supported values: 301, 302"),
        }
    }

    /// The in-memory variant has always answered 302, the database one 301.
    pub fn default_for(backend: StorageBackend) -> Self {
        if backend.is_persistent() {
            Self::Permanent
        } else {
            Self::Found
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::Found => StatusCode::FOUND,
            Self::Permanent => StatusCode::MOVED_PERMANENTLY,
        }
    }
}

impl ShortenerConfig {
    pub const fn default_max_attempts() -> u32 {
        20
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
        }
    }
}

impl CacheConfig {
    pub const fn default_max_entries() -> u64 {
        10_000
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend = StorageBackend::parse(
            &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string()),
        )?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./brevity.db?mode=rwc".to_string());

        let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_env("PORT", 8080u16)?;

        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080/".to_string());

        let redirect_status = match std::env::var("REDIRECT_STATUS") {
            Ok(value) => RedirectMode::parse(&value)?,
            Err(_) => RedirectMode::default_for(backend),
        };

        let max_attempts = parse_env("MAX_CODE_ATTEMPTS", ShortenerConfig::default_max_attempts())?;
        if max_attempts == 0 {
            bail!("MAX_CODE_ATTEMPTS must be at least 1");
        }

        let cache_max_entries = parse_env("CACHE_MAX_ENTRIES", CacheConfig::default_max_entries())?;

        let static_dir = std::env::var("STATIC_DIR").ok();

        let shutdown_grace_secs = parse_env("SHUTDOWN_GRACE_SECS", 5u64)?;

        Ok(Config {
            storage: StorageConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            base_url,
            redirect_status,
            shortener: ShortenerConfig { max_attempts },
            cache: CacheConfig {
                max_entries: cache_max_entries,
            },
            frontend: FrontendConfig { static_dir },
            shutdown_grace_secs,
        })
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{value}'")),
        Err(_) => Ok(default),
    }
}
