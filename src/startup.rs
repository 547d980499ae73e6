use anyhow::Context;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, StorageBackend};
use crate::storage::{CachedStorage, MemoryStorage, PostgresStorage, SqliteStorage, Storage};

/// Initialize logging from `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the configured storage and prepare its schema.
///
/// Failing to reach the database here is the one process-fatal error.
pub async fn init_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            return Ok(Arc::new(MemoryStorage::new()));
        }
        StorageBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.storage.url);
            Arc::new(
                SqliteStorage::new(&config.storage.url, config.storage.max_connections)
                    .await
                    .context("failed to open SQLite database")?,
            )
        }
        StorageBackend::Postgres => {
            info!("Using PostgreSQL storage");
            Arc::new(
                PostgresStorage::new(&config.storage.url, config.storage.max_connections)
                    .await
                    .context("failed to connect to PostgreSQL")?,
            )
        }
    };

    info!("Initializing database...");
    storage
        .init()
        .await
        .context("failed to initialize database schema")?;
    info!("Database initialized successfully");

    if config.cache.max_entries == 0 {
        info!("Read cache disabled");
        return Ok(storage);
    }

    info!(max_entries = config.cache.max_entries, "Read cache enabled");
    Ok(Arc::new(CachedStorage::new(
        storage,
        config.cache.max_entries,
    )))
}

/// Serve `router` until `shutdown_signal` resolves, then give in-flight
/// requests `grace` to finish before returning.
pub async fn run_server<F>(
    router: Router,
    listener: TcpListener,
    shutdown_signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                drain_rx.await.ok();
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // Server stopped on its own
            return result.context("server task panicked")?.context("server error");
        }
        _ = shutdown_signal => {}
    }

    info!(grace_secs = grace.as_secs(), "Draining in-flight requests");
    let _ = drain_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => info!("Server drained"),
        Ok(Ok(Err(e))) => error!(error = %e, "Server error during shutdown"),
        Ok(Err(e)) => error!(error = %e, "Server task panicked during shutdown"),
        Err(_) => {
            warn!("Shutdown grace period expired, dropping remaining connections");
            server.abort();
        }
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
