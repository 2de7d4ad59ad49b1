//! # Health Aggregator Actor
//!
//! Owns the subscription registry. A `GetHealthReport` snapshots the current
//! subscriptions and hands the fan-out to a spawned task, so a slow round
//! never delays subscriptions or other report requests.

use futures::future::join_all;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actors::{ChannelFactory, HealthCommandReceiver, ProxyActor};
use crate::constants::{HEALTH_SERVICE_NAME, SUBSCRIBER_FAILURE_PREFIX};
use crate::error::{ProxyError, ProxyResult};

use super::commands::HealthCommand;
use super::handle::HealthAggregatorHandle;
use super::registry::{HealthSubscription, HealthSubscriptionRegistry};
use super::report::HealthReport;

#[derive(Debug)]
pub struct HealthAggregatorActor {
    subscriber_timeout: Duration,
    command_rx: Option<HealthCommandReceiver>,
    task_handle: Option<JoinHandle<()>>,
}

impl ProxyActor for HealthAggregatorActor {
    fn name(&self) -> &'static str {
        HEALTH_SERVICE_NAME
    }

    fn started(&mut self) -> ProxyResult<()> {
        info!(
            actor = self.name(),
            subscriber_timeout_ms = self.subscriber_timeout.as_millis() as u64,
            "Health aggregator starting"
        );
        Ok(())
    }

    fn stopped(&mut self) -> ProxyResult<()> {
        info!(actor = self.name(), "Health aggregator stopped");
        Ok(())
    }
}

impl HealthAggregatorActor {
    pub fn new(subscriber_timeout: Duration, buffer_size: usize) -> (Self, HealthAggregatorHandle) {
        let (command_tx, command_rx) = ChannelFactory::health_command_channel(buffer_size);
        let actor = Self {
            subscriber_timeout,
            command_rx: Some(command_rx),
            task_handle: None,
        };
        (actor, HealthAggregatorHandle::new(command_tx))
    }

    pub fn start(&mut self) -> ProxyResult<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| ProxyError::Internal("Health aggregator already started".to_string()))?;
        self.started()?;

        let subscriber_timeout = self.subscriber_timeout;

        let handle = crate::spawn_named!("health_aggregator", async move {
            let mut registry = HealthSubscriptionRegistry::new();

            while let Some(command) = command_rx.recv().await {
                debug!(command = command.kind(), "Got command");
                match command {
                    HealthCommand::Subscribe {
                        reporter,
                        name,
                        resp,
                    } => {
                        let subscriber_id = reporter.subscriber_id();
                        let is_new = registry.subscribe(reporter, name.clone());
                        info!(
                            subscriber = %name,
                            subscriber_id = %subscriber_id,
                            is_new = is_new,
                            subscribers = registry.len(),
                            "Health subscription registered"
                        );
                        if resp.send(Ok(is_new)).is_err() {
                            debug!(subscriber = %name, "Subscriber gone before acknowledgement");
                        }
                    }
                    HealthCommand::GetHealthReport { resp } => {
                        let subscriptions = registry.snapshot();
                        tokio::spawn(async move {
                            let report = aggregate(subscriptions, subscriber_timeout).await;
                            if resp.send(Ok(report)).is_err() {
                                debug!("Health report requester gone before aggregation finished");
                            }
                        });
                    }
                    HealthCommand::Shutdown { resp } => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
            debug!("Health aggregator loop exited");
        });

        self.task_handle = Some(handle);
        Ok(())
    }

    pub async fn join(&mut self) -> ProxyResult<()> {
        if let Some(handle) = self.task_handle.take() {
            handle
                .await
                .map_err(|e| ProxyError::Internal(format!("Health aggregator task failed: {e}")))?;
        }
        self.stopped()
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Query every subscription concurrently and merge whatever comes back
///
/// Completes within roughly `subscriber_timeout` regardless of how many
/// subscribers hang.
pub async fn aggregate(
    subscriptions: Vec<HealthSubscription>,
    subscriber_timeout: Duration,
) -> HealthReport {
    let reports = join_all(
        subscriptions
            .into_iter()
            .map(|subscription| query_subscriber(subscription, subscriber_timeout)),
    )
    .await;

    reports.into_iter().collect()
}

async fn query_subscriber(subscription: HealthSubscription, timeout: Duration) -> HealthReport {
    let HealthSubscription { reporter, name } = subscription;

    match tokio::time::timeout(timeout, reporter.provide_health_report()).await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            warn!(subscriber = %name, error = %e, "Health report request failed");
            subscriber_failure(&name)
        }
        Err(_) => {
            warn!(
                subscriber = %name,
                timeout_ms = timeout.as_millis() as u64,
                "Health report request timed out"
            );
            subscriber_failure(&name)
        }
    }
}

fn subscriber_failure(name: &str) -> HealthReport {
    HealthReport::error(format!("{SUBSCRIBER_FAILURE_PREFIX} {name}"))
}
