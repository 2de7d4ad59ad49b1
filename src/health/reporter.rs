//! Seam between the aggregator and anything that can report its health

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ProxyResult;

use super::report::HealthReport;

/// A component that can be subscribed to the health aggregator
///
/// `subscriber_id` must be stable for the lifetime of the component; a second
/// subscription with the same id replaces the first.
#[async_trait]
pub trait HealthReporter: Send + Sync + 'static {
    fn subscriber_id(&self) -> Uuid;

    async fn provide_health_report(&self) -> ProxyResult<HealthReport>;
}
