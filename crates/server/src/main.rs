use std::future::IntoFuture;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songbook_core::{
    create_enrichment_system, load_config, validate_config, HttpMetadataSource, LivenessMonitor,
    MetadataSource, SongService, SongStore, SqliteSongStore,
};
use songbook_server::{api::create_router, state::AppState};

/// How long in-flight enrichment jobs get to finish after the server stops.
const ENRICHMENT_DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

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

    // Determine config path
    let config_path = std::env::var("SONGBOOK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite song store
    let store: Arc<dyn SongStore> = Arc::new(
        SqliteSongStore::new(&config.database.path).context("Failed to open song store")?,
    );
    info!("Song store initialized");

    // Create metadata client
    let source: Arc<dyn MetadataSource> = Arc::new(
        HttpMetadataSource::new(&config.metadata).context("Failed to create metadata client")?,
    );
    info!("Metadata service: {}", config.metadata.url);

    // Create enrichment system
    let (enrichment_handle, enrichment_worker) = create_enrichment_system(
        Arc::clone(&store),
        source,
        config.enrichment.queue_size,
        config.enrichment.max_concurrent,
    );
    let worker_handle = tokio::spawn(enrichment_worker.run());

    let songs = SongService::new(Arc::clone(&store), enrichment_handle);
    let liveness = LivenessMonitor::from_config(&config.liveness);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    let state = Arc::new(AppState::new(config, songs));
    let app = create_router(state);

    // Start server
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Serve until a shutdown signal arrives or the store stops answering.
    // Dropping the server future drops the router and with it the last
    // enrichment handle, which lets the worker drain and exit.
    let outcome = tokio::select! {
        result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future() => {
            result.context("Server error")
        }
        unreachable = liveness.run(Arc::clone(&store)) => {
            Err(anyhow::Error::new(unreachable))
        }
    };

    info!("Server shutting down...");

    match tokio::time::timeout(ENRICHMENT_DRAIN_TIMEOUT, worker_handle).await {
        Ok(Ok(())) => info!("Enrichment worker stopped"),
        Ok(Err(e)) => warn!("Enrichment worker panicked: {}", e),
        Err(_) => warn!(
            "Enrichment worker did not stop within {:?}, abandoning pending jobs",
            ENRICHMENT_DRAIN_TIMEOUT
        ),
    }

    outcome
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
}
