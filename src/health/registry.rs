//! Subscription set owned by the health aggregator

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::reporter::HealthReporter;

/// One subscribed reporter and its display name
#[derive(Clone)]
pub struct HealthSubscription {
    pub reporter: Arc<dyn HealthReporter>,
    pub name: String,
}

impl std::fmt::Debug for HealthSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthSubscription")
            .field("subscriber_id", &self.reporter.subscriber_id())
            .field("name", &self.name)
            .finish()
    }
}

/// Subscriptions keyed by subscriber id
///
/// There is no removal; a reporter that goes away keeps failing its health
/// query and shows up as an error entry instead.
#[derive(Debug, Default)]
pub struct HealthSubscriptionRegistry {
    subscriptions: HashMap<Uuid, HealthSubscription>,
}

impl HealthSubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns `true` when the subscriber was new
    pub fn subscribe(&mut self, reporter: Arc<dyn HealthReporter>, name: impl Into<String>) -> bool {
        let id = reporter.subscriber_id();
        self.subscriptions
            .insert(
                id,
                HealthSubscription {
                    reporter,
                    name: name.into(),
                },
            )
            .is_none()
    }

    /// Entries at this point in time, for one aggregation round
    pub fn snapshot(&self) -> Vec<HealthSubscription> {
        self.subscriptions.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
