//! Namespaced access to the backing store for call contexts

use std::sync::Arc;
use std::time::Duration;

use crate::health::HealthReport;
use crate::store::{StoreResult, StoreService};

/// Store access for one key namespace
///
/// Every resource id is stored under `<key_prefix>:<resource_id>` with the
/// configured TTL; expiry is left entirely to the backend.
pub struct PersistentCache<S> {
    store: Arc<S>,
    key_prefix: String,
    ttl: Duration,
}

impl<S> Clone for PersistentCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key_prefix: self.key_prefix.clone(),
            ttl: self.ttl,
        }
    }
}

impl<S: StoreService> std::fmt::Debug for PersistentCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCache")
            .field("store", &self.store.provider_name())
            .field("key_prefix", &self.key_prefix)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<S: StoreService + 'static> PersistentCache<S> {
    pub fn new(store: S, key_prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store: Arc::new(store),
            key_prefix: key_prefix.into(),
            ttl,
        }
    }

    pub fn key(&self, resource_id: &str) -> String {
        format!("{}:{}", self.key_prefix, resource_id)
    }

    pub async fn query(&self, resource_id: &str) -> StoreResult<Option<String>> {
        self.store.get(&self.key(resource_id)).await
    }

    pub async fn update(&self, resource_id: &str, value: &str) -> StoreResult<()> {
        self.store.set(&self.key(resource_id), value, self.ttl).await
    }

    /// Ping the store and describe any failure under the component's name
    pub async fn health_report(&self, component: &str) -> HealthReport {
        match self.store.health_check().await {
            Ok(true) => HealthReport::empty(),
            Ok(false) => HealthReport::error(format!(
                "{component}: {} store reported unhealthy",
                self.store.provider_name()
            )),
            Err(e) => HealthReport::error(format!("{component}: {e}")),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.store.provider_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreProvider;

    fn cache() -> PersistentCache<StoreProvider> {
        PersistentCache::new(
            StoreProvider::memory(100),
            "ari-proxy:call-context-provider",
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_key_is_namespaced() {
        assert_eq!(
            cache().key("channel-1"),
            "ari-proxy:call-context-provider:channel-1"
        );
    }

    #[tokio::test]
    async fn test_update_then_query() {
        let cache = cache();
        assert_eq!(cache.query("r").await.unwrap(), None);
        cache.update("r", "c").await.unwrap();
        assert_eq!(cache.query("r").await.unwrap(), Some("c".to_string()));
    }

    #[tokio::test]
    async fn test_clones_share_the_store() {
        let cache = cache();
        let other = cache.clone();
        cache.update("shared", "ctx").await.unwrap();
        assert_eq!(other.query("shared").await.unwrap(), Some("ctx".to_string()));
    }

    #[tokio::test]
    async fn test_entries_expire_after_the_cache_ttl() {
        let cache = PersistentCache::new(
            StoreProvider::memory(100),
            "ari-proxy:call-context-provider",
            Duration::from_millis(50),
        );
        cache.update("short-lived", "ctx").await.unwrap();
        assert_eq!(cache.query("short-lived").await.unwrap(), Some("ctx".to_string()));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.query("short-lived").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_healthy_store_gives_empty_report() {
        assert!(cache().health_report("test").await.is_healthy());
    }
}
