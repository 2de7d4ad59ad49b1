//! # Health Check Handlers

use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use crate::constants::{HEALTH_SERVICE_NAME, SMOKE_OK_MESSAGE, SUBSCRIBER_FAILURE_PREFIX};
use crate::health::{HealthReport, HealthResponse};
use crate::web::state::AppState;

/// Aggregated health report: GET /health
///
/// Always answers 200; an empty `errors` array means healthy. If the
/// aggregator itself cannot be reached that is reported as an error entry.
pub async fn health_report(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = match state.health.health_report().await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Health aggregator unavailable");
            HealthReport::error(format!("{SUBSCRIBER_FAILURE_PREFIX} {HEALTH_SERVICE_NAME}"))
        }
    };
    debug!(errors = report.errors().len(), "Serving health report");
    Json(HealthResponse::from(report))
}

/// Liveness probe: GET /health/smoke
///
/// Touches no actor and no store.
pub async fn smoke() -> &'static str {
    SMOKE_OK_MESSAGE
}
