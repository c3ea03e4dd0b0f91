// src/main.rs

//! Quill daemon binary entry point.
//!
//! Usage: `quill-daemon [CONFIG_PATH]`

use anyhow::Context;
use quill_daemon::{DaemonConfig, RpcServer, WalletService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Quill Wallet Daemon");
    tracing::info!("Version: {}", quill_daemon::DAEMON_VERSION);

    // Load configuration
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => DaemonConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DaemonConfig::default(),
    };

    let service = Arc::new(
        WalletService::from_config(config.clone()).context("starting wallet service")?,
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        tracing::info!("Shutting down");
    };

    if config.rpc.enabled {
        RpcServer::new(config.rpc.listen_addr, service)
            .start(shutdown)
            .await?;
    } else {
        tracing::warn!("RPC server disabled; nothing to serve");
        shutdown.await;
    }

    Ok(())
}
