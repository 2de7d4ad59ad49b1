#![allow(dead_code)]
//! # Shared Test Infrastructure
//!
//! Store and subscriber doubles plus a small harness that runs a call context
//! provider over any `StoreService`.

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use uuid::Uuid;

use ari_proxy_core::call_context::{
    CallContextProviderActor, CallContextProviderHandle, PersistentCache,
};
use ari_proxy_core::constants::DEFAULT_KEY_PREFIX;
use ari_proxy_core::error::{ProxyError, ProxyResult};
use ari_proxy_core::health::{HealthReport, HealthReporter};
use ari_proxy_core::store::{StoreError, StoreProvider, StoreResult, StoreService};

/// Provider actor plus its handle and the cache it writes through
pub struct ProviderHarness<S: StoreService + 'static> {
    pub actor: CallContextProviderActor<S>,
    pub handle: CallContextProviderHandle,
    pub cache: PersistentCache<S>,
}

impl ProviderHarness<StoreProvider> {
    pub fn with_memory_store() -> Result<Self> {
        Self::with_store(StoreProvider::memory(1_000))
    }
}

impl<S: StoreService + 'static> ProviderHarness<S> {
    pub fn with_store(store: S) -> Result<Self> {
        let cache = PersistentCache::new(store, DEFAULT_KEY_PREFIX, Duration::from_secs(60));
        let (mut actor, handle) = CallContextProviderActor::new(cache.clone(), 64);
        actor.start()?;
        Ok(Self {
            actor,
            handle,
            cache,
        })
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.handle.shutdown().await?;
        self.actor.join().await?;
        Ok(())
    }
}

/// Poll `check` until it returns `true` or `within` elapses
pub async fn eventually<F, Fut>(within: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + within;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct UnreachableStore;

impl StoreService for UnreachableStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> StoreResult<()> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Err(StoreError::ConnectionError("connection refused".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "unreachable"
    }
}

/// Store that answers reads only after `delay`
#[derive(Debug)]
pub struct SlowStore {
    pub inner: StoreProvider,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: StoreProvider::memory(1_000),
            delay,
        }
    }
}

impl StoreService for SlowStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "slow"
    }
}

/// Store that stalls every write of one particular value
#[derive(Debug)]
pub struct DelayedWriteStore {
    pub inner: StoreProvider,
    pub slow_value: String,
    pub delay: Duration,
}

impl DelayedWriteStore {
    pub fn new(slow_value: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: StoreProvider::memory(1_000),
            slow_value: slow_value.into(),
            delay,
        }
    }
}

impl StoreService for DelayedWriteStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        if value == self.slow_value {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.set(key, value, ttl).await
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "delayed-write"
    }
}

/// Scripted health subscriber
#[derive(Debug, Clone)]
pub enum StubReporter {
    Healthy(Uuid),
    Unhealthy(Uuid, String),
    Failing(Uuid),
    /// Never answers
    Hanging(Uuid),
}

impl StubReporter {
    pub fn healthy() -> Self {
        Self::Healthy(Uuid::new_v4())
    }

    pub fn unhealthy(message: &str) -> Self {
        Self::Unhealthy(Uuid::new_v4(), message.to_string())
    }

    pub fn failing() -> Self {
        Self::Failing(Uuid::new_v4())
    }

    pub fn hanging() -> Self {
        Self::Hanging(Uuid::new_v4())
    }
}

#[async_trait]
impl HealthReporter for StubReporter {
    fn subscriber_id(&self) -> Uuid {
        match self {
            Self::Healthy(id) | Self::Unhealthy(id, _) | Self::Failing(id) | Self::Hanging(id) => {
                *id
            }
        }
    }

    async fn provide_health_report(&self) -> ProxyResult<HealthReport> {
        match self {
            Self::Healthy(_) => Ok(HealthReport::empty()),
            Self::Unhealthy(_, message) => Ok(HealthReport::error(message.clone())),
            Self::Failing(_) => Err(ProxyError::ChannelError("actor mailbox closed".to_string())),
            Self::Hanging(_) => std::future::pending().await,
        }
    }
}
