//! # Stockroom Server Binary
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()         RUST_LOG or "info,stockroom=debug,sqlx=warn" │
//! │  2. ServerConfig::load()   defaults → stockroom.toml → STOCKROOM_*      │
//! │  3. AppState::open()       SQLite (migrations) or key-value file        │
//! │  4. axum::serve()          until Ctrl+C / SIGTERM                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pass a config file path as the only argument to skip the lookup.

use std::path::PathBuf;

use anyhow::Context;
use stockroom_server::{router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Stockroom server...");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServerConfig::load(config_path).context("loading configuration")?;
    info!(
        bind = %config.server.bind_address(),
        backend = %config.storage.backend,
        "Configuration loaded"
    );

    let state = AppState::open(&config).await.context("opening store")?;

    let listener = TcpListener::bind(config.server.bind_address())
        .await
        .with_context(|| format!("binding {}", config.server.bind_address()))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Show trace for stockroom crates only
/// - Default: INFO, DEBUG for stockroom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Graceful shutdown signal handler.
///
/// If a handler can't be installed the server keeps running on the other.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}
