//! Store service trait definition

use super::errors::StoreResult;
use std::time::Duration;

/// Trait defining the operations the call context provider needs from a backend
///
/// Keys passed here are already namespaced by the caller.
pub trait StoreService: Send + Sync {
    /// Get a value by key
    ///
    /// Returns `Ok(Some(value))` when present, `Ok(None)` when absent.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<String>>> + Send;

    /// Upsert a value with a TTL
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Liveness probe against the backend
    fn health_check(&self) -> impl std::future::Future<Output = StoreResult<bool>> + Send;

    /// Get the name of the store provider
    fn provider_name(&self) -> &'static str;
}
