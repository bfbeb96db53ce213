//! nicheboard-api - JSON API for organizing niche research
//!
//! Serves CRUD endpoints for niches, ideas, highlights and subreddits backed
//! by either a local SQLite database or a hosted PostgREST-compatible store.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nicheboard_api::{build_router, AppState};
use nicheboard_common::config::StoreConfigResolver;
use nicheboard_common::store;
use tokio::signal;
use tracing::{error, info};

/// Command-line arguments for nicheboard-api
#[derive(Parser, Debug)]
#[command(name = "nicheboard-api")]
#[command(about = "JSON API for niches, ideas, highlights and subreddits")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:5730", env = "NICHEBOARD_LISTEN")]
    listen: SocketAddr,

    /// Store endpoint URL (sqlite:... or https://...)
    #[arg(long)]
    store_url: Option<String>,

    /// Store access key
    #[arg(long)]
    access_key: Option<String>,

    /// TOML config file (default: ~/.config/nicheboard/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Nicheboard API (nicheboard-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let mut resolver = StoreConfigResolver::new().with_cli(args.store_url, args.access_key);
    if let Some(path) = args.config {
        resolver = resolver.with_config_file(path);
    }

    let config = match resolver.resolve() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let store = store::connect(&config)
        .await
        .context("Failed to open store")?;

    let app = build_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", args.listen))?;
    info!("nicheboard-api listening on http://{}", args.listen);
    info!("Health check: http://{}/health", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
