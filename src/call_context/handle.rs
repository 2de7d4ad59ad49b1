//! Cloneable client for the call context provider

use async_trait::async_trait;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::actors::{CallContextCommandSender, CommandResponder};
use crate::error::ProxyResult;
use crate::health::{HealthReport, HealthReporter};

use super::commands::CallContextCommand;
use super::types::{
    CallContextProvided, CallContextRegistered, CallContextStats, ProvideCallContext,
    RegisterCallContext,
};

/// Address of a running `CallContextProviderActor`
///
/// Every clone shares the same mailbox and the same subscriber id, so the
/// provider is a single subscriber however many handles exist.
#[derive(Debug, Clone)]
pub struct CallContextProviderHandle {
    sender: CallContextCommandSender,
    subscriber_id: Uuid,
}

impl CallContextProviderHandle {
    pub(crate) fn new(sender: CallContextCommandSender) -> Self {
        Self {
            sender,
            subscriber_id: Uuid::new_v4(),
        }
    }

    /// Unconditionally store `resource_id → call_context`
    pub async fn register(
        &self,
        resource_id: impl Into<String>,
        call_context: impl Into<String>,
    ) -> ProxyResult<CallContextRegistered> {
        let request = RegisterCallContext {
            resource_id: resource_id.into(),
            call_context: call_context.into(),
        };
        self.request(|resp| CallContextCommand::Register { request, resp })
            .await
    }

    pub async fn provide(&self, request: ProvideCallContext) -> ProxyResult<CallContextProvided> {
        self.request(|resp| CallContextCommand::Provide { request, resp })
            .await
    }

    /// Shorthand for a `LOOKUP_ONLY` provide
    pub async fn lookup(&self, resource_id: impl Into<String>) -> ProxyResult<CallContextProvided> {
        self.provide(ProvideCallContext::lookup_only(resource_id))
            .await
    }

    pub async fn provide_health_report(&self) -> ProxyResult<HealthReport> {
        self.request(|resp| CallContextCommand::ProvideHealthReport { resp })
            .await
    }

    pub async fn stats(&self) -> ProxyResult<CallContextStats> {
        self.request(|resp| CallContextCommand::GetStats { resp })
            .await
    }

    pub async fn shutdown(&self) -> ProxyResult<()> {
        self.request(|resp| CallContextCommand::Shutdown { resp })
            .await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(CommandResponder<T>) -> CallContextCommand,
    ) -> ProxyResult<T> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.sender.send(command(resp_tx)).await?;
        resp_rx.await?
    }
}

#[async_trait]
impl HealthReporter for CallContextProviderHandle {
    fn subscriber_id(&self) -> Uuid {
        self.subscriber_id
    }

    async fn provide_health_report(&self) -> ProxyResult<HealthReport> {
        CallContextProviderHandle::provide_health_report(self).await
    }
}
