use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use brevity::config::{Config, RedirectMode, StorageBackend};
use brevity::startup;
use brevity::state::AppState;

/// URL shortener with in-memory or database-backed storage.
///
/// Every option falls back to its environment variable (see `.env`).
#[derive(Parser, Debug)]
#[command(name = "brevity", version, about)]
struct Cli {
    /// Storage backend: memory, sqlite or postgres
    #[arg(long)]
    backend: Option<String>,

    /// Database connection string
    #[arg(long)]
    database_url: Option<String>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(long)]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(backend) = self.backend {
            config.storage.backend = StorageBackend::parse(&backend)?;
            // Keep the backend's redirect default unless it was set explicitly
            if std::env::var("REDIRECT_STATUS").is_err() {
                config.redirect_status = RedirectMode::default_for(config.storage.backend);
            }
        }
        if let Some(url) = self.database_url {
            config.storage.url = url;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    startup::init_logging();

    // Load configuration
    let mut config = Config::from_env()?;
    cli.apply(&mut config)?;
    info!("Loaded configuration");

    // Initialize storage
    let storage = startup::init_storage(&config).await?;

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("Serving pages from directory: {}", static_dir);
    } else {
        info!("Serving embedded pages");
    }
    info!(
        status = config.redirect_status.status_code().as_u16(),
        "Redirect status"
    );

    let state = Arc::new(AppState::from_config(&config, Arc::clone(&storage)));
    let router = brevity::build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);
    info!("   - Short links are served under {}", config.base_url);

    startup::run_server(
        router,
        listener,
        startup::shutdown_signal(),
        config.shutdown_grace(),
    )
    .await?;

    // Close the data connection only after the server has drained
    storage.close().await;
    info!("Storage closed, server exited gracefully");

    Ok(())
}
