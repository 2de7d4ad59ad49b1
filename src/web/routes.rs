//! # Route Definitions

use axum::routing::get;
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Health endpoints:
/// - `/health` - merged report of every subscribed component
/// - `/health/smoke` - fixed-string liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_report))
        .route("/health/smoke", get(handlers::health::smoke))
}
