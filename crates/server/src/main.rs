use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediasearch_core::{
    load_config, load_config_from_env, validate_config, Config, ExternalSearchClient,
    JackettClient, MdbListClient, SearchAggregator, SearchProvider,
};
use mediasearch_server::api::create_router;
use mediasearch_server::state::AppState;

/// Default config file, used when present and no path is given.
const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = read_config()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Create providers
    let external = ExternalSearchClient::new(config.external_search.clone())
        .context("Failed to create external search client")?;
    let jackett =
        JackettClient::new(config.jackett.clone()).context("Failed to create Jackett client")?;

    let providers: Vec<Arc<dyn SearchProvider>> = vec![Arc::new(external), Arc::new(jackett)];
    for provider in &providers {
        if provider.is_configured() {
            info!("Search provider enabled: {}", provider.name());
        } else {
            warn!("Search provider not configured: {}", provider.name());
        }
    }
    let aggregator = SearchAggregator::new(providers);

    // Create list/metadata client
    let mdblist = Arc::new(
        MdbListClient::new(config.mdblist.clone()).context("Failed to create MDBList client")?,
    );
    if !mdblist.is_configured() {
        warn!("MDBList API key not set, metadata features disabled");
    }

    // Create app state
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, aggregator, mdblist));

    // Create router
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Load configuration from `MEDIASEARCH_CONFIG`, `config.toml`, or the
/// environment alone.
fn read_config() -> Result<Config> {
    let explicit = std::env::var("MEDIASEARCH_CONFIG").ok().map(PathBuf::from);
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);

    let path = match explicit {
        Some(path) => Some(path),
        None if default_path.exists() => Some(default_path),
        None => None,
    };

    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => {
            info!("No config file found, using environment only");
            load_config_from_env().context("Failed to load config from environment")
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
