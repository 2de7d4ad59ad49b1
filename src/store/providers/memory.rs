//! In-process store backed by a moka cache
//!
//! Each process keeps its own mapping: call contexts do not survive a restart
//! and are not visible to other proxy instances. Good enough for a single
//! instance and for tests; production deployments use Redis.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::MemoryStoreConfig;
use crate::store::errors::StoreResult;
use crate::store::traits::StoreService;

/// A call context together with the TTL it was written with
#[derive(Debug, Clone)]
struct StoredContext {
    call_context: String,
    ttl: Duration,
}

/// Expires every entry after the TTL given to the `set` that wrote it
///
/// An overwrite restarts the clock, like `SETEX` does.
struct PerEntryTtl;

impl moka::Expiry<String, StoredContext> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredContext,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredContext,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Clone)]
pub struct MemoryStoreService {
    entries: moka::future::Cache<String, StoredContext>,
}

impl std::fmt::Debug for MemoryStoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStoreService")
            .field("max_capacity", &self.entries.policy().max_capacity())
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

impl MemoryStoreService {
    pub fn from_config(config: &MemoryStoreConfig) -> Self {
        Self::new(config.max_capacity)
    }

    pub fn new(max_capacity: u64) -> Self {
        let entries = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        debug!(max_capacity = max_capacity, "In-memory call context store created");
        Self { entries }
    }
}

impl StoreService for MemoryStoreService {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).await.map(|stored| stored.call_context))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let stored = StoredContext {
            call_context: value.to_string(),
            ttl,
        };
        self.entries.insert(key.to_string(), stored).await;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
