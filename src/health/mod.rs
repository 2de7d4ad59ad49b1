//! # Health Aggregation
//!
//! Components that want to appear in the aggregated report subscribe to the
//! aggregator once at startup with a `HealthReporter` and a display name.
//! Each report request queries every subscriber under a short timeout and
//! merges the results; a subscriber that fails or times out contributes a
//! single `failed to get report for <name>` entry.

pub mod aggregator;
pub mod commands;
pub mod handle;
pub mod registry;
pub mod report;
pub mod reporter;

pub use aggregator::HealthAggregatorActor;
pub use commands::HealthCommand;
pub use handle::HealthAggregatorHandle;
pub use registry::{HealthSubscription, HealthSubscriptionRegistry};
pub use report::{HealthReport, HealthResponse};
pub use reporter::HealthReporter;
