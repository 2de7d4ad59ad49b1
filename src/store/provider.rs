//! Store provider selected from configuration
//!
//! Enum dispatch over the configured backend. A backend that fails to connect
//! is a startup error; there is no fallback to the in-memory store.

use super::errors::{StoreError, StoreResult};
use super::providers::{MemoryStoreService, RedisStoreService};
use super::traits::StoreService;
use crate::config::StoreConfig;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
enum StoreBackend {
    /// Redis store provider (boxed to reduce enum size)
    Redis(Box<RedisStoreService>),
    Memory(Box<MemoryStoreService>),
}

/// Backing store handle shared by everything that persists call contexts
#[derive(Debug, Clone)]
pub struct StoreProvider {
    backend: StoreBackend,
}

impl StoreProvider {
    pub async fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let backend = match config.backend.as_str() {
            "redis" => {
                let redis_config = config.redis.clone().unwrap_or_default();
                let service = RedisStoreService::from_config(&redis_config).await?;
                StoreBackend::Redis(Box::new(service))
            }
            "memory" => {
                let memory_config = config.memory.clone().unwrap_or_default();
                StoreBackend::Memory(Box::new(MemoryStoreService::from_config(&memory_config)))
            }
            other => {
                return Err(StoreError::ConnectionError(format!(
                    "Unknown store backend '{other}'"
                )))
            }
        };

        let provider = Self { backend };
        info!(
            backend = provider.provider_name(),
            ttl_seconds = config.entry_ttl_seconds,
            "Store provider initialized"
        );
        Ok(provider)
    }

    /// In-memory provider, mostly for tests and single-instance deployments
    pub fn memory(max_capacity: u64) -> Self {
        Self {
            backend: StoreBackend::Memory(Box::new(MemoryStoreService::new(max_capacity))),
        }
    }

    pub fn is_distributed(&self) -> bool {
        matches!(self.backend, StoreBackend::Redis(_))
    }
}

impl StoreService for StoreProvider {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match &self.backend {
            StoreBackend::Redis(s) => s.get(key).await,
            StoreBackend::Memory(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        match &self.backend {
            StoreBackend::Redis(s) => s.set(key, value, ttl).await,
            StoreBackend::Memory(s) => s.set(key, value, ttl).await,
        }
    }

    async fn health_check(&self) -> StoreResult<bool> {
        match &self.backend {
            StoreBackend::Redis(s) => s.health_check().await,
            StoreBackend::Memory(s) => s.health_check().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match &self.backend {
            StoreBackend::Redis(s) => s.provider_name(),
            StoreBackend::Memory(s) => s.provider_name(),
        }
    }
}
