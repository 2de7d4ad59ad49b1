//! Shared state for the health HTTP surface

use crate::health::HealthAggregatorHandle;

#[derive(Debug, Clone)]
pub struct AppState {
    pub health: HealthAggregatorHandle,
}

impl AppState {
    pub fn new(health: HealthAggregatorHandle) -> Self {
        Self { health }
    }
}
