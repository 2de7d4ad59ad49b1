//! Cloneable client for the health aggregator

use std::sync::Arc;
use tokio::sync::oneshot;

use crate::actors::{CommandResponder, HealthCommandSender};
use crate::error::ProxyResult;

use super::commands::HealthCommand;
use super::report::HealthReport;
use super::reporter::HealthReporter;

#[derive(Debug, Clone)]
pub struct HealthAggregatorHandle {
    sender: HealthCommandSender,
}

impl HealthAggregatorHandle {
    pub(crate) fn new(sender: HealthCommandSender) -> Self {
        Self { sender }
    }

    /// Make `reporter` part of every future aggregated report
    ///
    /// Returns `true` when the reporter was not subscribed before.
    pub async fn subscribe<R: HealthReporter>(
        &self,
        reporter: R,
        name: impl Into<String>,
    ) -> ProxyResult<bool> {
        let reporter: Arc<dyn HealthReporter> = Arc::new(reporter);
        let name = name.into();
        self.request(|resp| HealthCommand::Subscribe {
            reporter,
            name,
            resp,
        })
        .await
    }

    /// Merged report of every current subscriber
    pub async fn health_report(&self) -> ProxyResult<HealthReport> {
        self.request(|resp| HealthCommand::GetHealthReport { resp })
            .await
    }

    pub async fn shutdown(&self) -> ProxyResult<()> {
        self.request(|resp| HealthCommand::Shutdown { resp }).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(CommandResponder<T>) -> HealthCommand,
    ) -> ProxyResult<T> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.sender.send(command(resp_tx)).await?;
        resp_rx.await?
    }
}
