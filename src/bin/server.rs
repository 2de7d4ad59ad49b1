//! # ARI Proxy Server
//!
//! Runs the call context provider and the health HTTP surface as a standalone
//! process.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: in-memory store, health on 0.0.0.0:8080
//! cargo run --bin ari-proxy-server
//!
//! # With a configuration file
//! ARI_PROXY_CONFIG=config/ari-proxy.toml ARI_PROXY_ENV=production cargo run --bin ari-proxy-server
//! ```

use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info};

use ari_proxy_core::bootstrap::ProxyBootstrap;
use ari_proxy_core::config::{detect_environment, ProxyConfig};
use ari_proxy_core::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ProxyConfig::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init_tracing(&Default::default());
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init_tracing(&config.logging);

    info!("Starting ARI proxy server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));
    info!("   Environment: {}", detect_environment());

    let mut system = match ProxyBootstrap::bootstrap(config).await {
        Ok(system) => system,
        Err(e) => {
            error!(error = %e, "Failed to bootstrap ARI proxy core");
            return ExitCode::FAILURE;
        }
    };

    info!("   Health: http://{}/health", system.health_address());
    info!("   Press Ctrl+C to shutdown gracefully");

    shutdown_signal().await;

    info!("Shutdown signal received, initiating graceful shutdown...");

    if let Err(e) = system.stop().await {
        error!(error = %e, "Failed to stop ARI proxy core cleanly");
        return ExitCode::FAILURE;
    }

    info!("ARI proxy server shutdown complete");
    ExitCode::SUCCESS
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
