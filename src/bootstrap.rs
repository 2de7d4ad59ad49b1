//! # Proxy Bootstrap
//!
//! Wires the store, both actors and the health HTTP surface together.
//!
//! Startup order:
//! 1. Store provider (a Redis connection failure aborts startup)
//! 2. Call context provider actor
//! 3. Health aggregator actor, with the provider subscribed to it
//! 4. Health HTTP server (a bind failure aborts startup)

use std::net::SocketAddr;
use tracing::{info, warn};

use crate::actors::ProxyActor;
use crate::call_context::{CallContextProviderActor, CallContextProviderHandle, PersistentCache};
use crate::config::ProxyConfig;
use crate::constants::CALL_CONTEXT_PROVIDER_NAME;
use crate::error::ProxyResult;
use crate::health::{HealthAggregatorActor, HealthAggregatorHandle};
use crate::store::{StoreProvider, StoreService};
use crate::web::{self, state::AppState, WebServerHandle};

/// A running proxy core
#[derive(Debug)]
pub struct ProxySystemHandle {
    pub call_context: CallContextProviderHandle,
    pub health: HealthAggregatorHandle,
    pub config: ProxyConfig,
    provider_actor: CallContextProviderActor<StoreProvider>,
    aggregator_actor: HealthAggregatorActor,
    web_server: WebServerHandle,
}

impl ProxySystemHandle {
    /// Address the health HTTP server is listening on
    pub fn health_address(&self) -> SocketAddr {
        self.web_server.local_addr()
    }

    /// Stop the web server, then both actors
    ///
    /// Every component is asked to stop even if an earlier one fails; the
    /// first error is returned.
    pub async fn stop(&mut self) -> ProxyResult<()> {
        info!("Stopping ARI proxy core");
        let mut first_error = None;

        if let Err(e) = self.web_server.stop().await {
            warn!(error = %e, "Failed to stop health HTTP server");
            first_error = first_error.or(Some(e));
        }

        if let Err(e) = self.health.shutdown().await {
            warn!(error = %e, "Health aggregator did not accept shutdown");
        }
        if let Err(e) = self.aggregator_actor.join().await {
            warn!(actor = self.aggregator_actor.name(), error = %e, "Actor stop failed");
            first_error = first_error.or(Some(e));
        }

        if let Err(e) = self.call_context.shutdown().await {
            warn!(error = %e, "Call context provider did not accept shutdown");
        }
        if let Err(e) = self.provider_actor.join().await {
            warn!(actor = self.provider_actor.name(), error = %e, "Actor stop failed");
            first_error = first_error.or(Some(e));
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("ARI proxy core stopped");
                Ok(())
            }
        }
    }
}

pub struct ProxyBootstrap;

impl ProxyBootstrap {
    pub async fn bootstrap(config: ProxyConfig) -> ProxyResult<ProxySystemHandle> {
        config.validate()?;
        info!(
            backend = %config.store.backend,
            bind_address = %config.health.bind_address,
            "Bootstrapping ARI proxy core"
        );

        let store = StoreProvider::from_config(&config.store).await?;
        info!(
            store = store.provider_name(),
            distributed = store.is_distributed(),
            "Store provider ready"
        );
        let cache = PersistentCache::new(
            store,
            config.store.key_prefix.clone(),
            config.store.entry_ttl(),
        );

        let (mut provider_actor, call_context) =
            CallContextProviderActor::new(cache, config.call_context.mailbox_buffer_size);
        provider_actor.start()?;

        let (mut aggregator_actor, health) = HealthAggregatorActor::new(
            config.health.subscriber_timeout(),
            config.health.mailbox_buffer_size,
        );
        aggregator_actor.start()?;

        health
            .subscribe(call_context.clone(), CALL_CONTEXT_PROVIDER_NAME)
            .await?;

        let web_server = web::serve(&config.health.bind_address, AppState::new(health.clone())).await?;

        info!(
            health_address = %web_server.local_addr(),
            "ARI proxy core started"
        );

        Ok(ProxySystemHandle {
            call_context,
            health,
            config,
            provider_actor,
            aggregator_actor,
            web_server,
        })
    }
}
