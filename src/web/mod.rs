//! # Health HTTP Surface
//!
//! Minimal read-only axum server exposing the aggregated health report.
//!
//! - [`routes`] - route definitions
//! - [`handlers`] - request handlers
//! - [`state`] - shared application state

pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{ProxyError, ProxyResult};
use state::AppState;

/// Create the application router with all routes and middleware
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// A running web server
#[derive(Debug)]
pub struct WebServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task_handle: Option<JoinHandle<()>>,
}

impl WebServerHandle {
    /// Address actually bound (useful when binding port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(&mut self) -> ProxyResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| ProxyError::Internal(format!("Web server task failed: {e}")))?;
        }
        info!(address = %self.local_addr, "Health HTTP server stopped");
        Ok(())
    }
}

/// Bind `bind_address` and serve the health routes in the background
///
/// # Errors
///
/// `ProxyError::BindError` when the address cannot be bound; the process
/// has no degraded mode without its health surface.
pub async fn serve(bind_address: &str, app_state: AppState) -> ProxyResult<WebServerHandle> {
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| ProxyError::BindError {
            address: bind_address.to_string(),
            reason: e.to_string(),
        })?;
    let local_addr = listener.local_addr().map_err(|e| ProxyError::BindError {
        address: bind_address.to_string(),
        reason: e.to_string(),
    })?;

    let app = create_app(app_state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });

    let task_handle = crate::spawn_named!("health_web_server", async move {
        if let Err(e) = server.await {
            error!("Health HTTP server error: {}", e);
        }
    });

    info!(address = %local_addr, "Health HTTP server online");

    Ok(WebServerHandle {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task_handle: Some(task_handle),
    })
}
