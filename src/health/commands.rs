//! Commands accepted by the health aggregator

use std::sync::Arc;

use crate::actors::CommandResponder;

use super::report::HealthReport;
use super::reporter::HealthReporter;

pub enum HealthCommand {
    /// Add or replace a subscription; replies `true` for a new subscriber
    Subscribe {
        reporter: Arc<dyn HealthReporter>,
        name: String,
        resp: CommandResponder<bool>,
    },
    /// Fan out to every subscriber and reply with the merged report
    GetHealthReport { resp: CommandResponder<HealthReport> },
    Shutdown { resp: CommandResponder<()> },
}

impl HealthCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            HealthCommand::Subscribe { .. } => "subscribe",
            HealthCommand::GetHealthReport { .. } => "get_health_report",
            HealthCommand::Shutdown { .. } => "shutdown",
        }
    }
}

impl std::fmt::Debug for HealthCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthCommand::Subscribe { name, reporter, .. } => f
                .debug_struct("Subscribe")
                .field("name", name)
                .field("subscriber_id", &reporter.subscriber_id())
                .finish_non_exhaustive(),
            other => f.write_str(other.kind()),
        }
    }
}
