//! # System Constants
//!
//! Fixed names, messages and defaults shared by the call context provider,
//! the health aggregator and the web surface.

/// Name under which the call context provider announces itself for monitoring
pub const CALL_CONTEXT_PROVIDER_NAME: &str = "call-context-provider";

/// Name of the health aggregator actor
pub const HEALTH_SERVICE_NAME: &str = "health-service";

/// Default namespace for call context keys in the backing store
pub const DEFAULT_KEY_PREFIX: &str = "ari-proxy:call-context-provider";

/// Fixed body of the liveness probe
pub const SMOKE_OK_MESSAGE: &str = "feeling good";

/// Prefix for the error entry recorded when a subscriber does not answer
pub const SUBSCRIBER_FAILURE_PREFIX: &str = "failed to get report for";

pub mod defaults {
    /// Per-subscriber health query bound
    pub const SUBSCRIBER_TIMEOUT_MS: u64 = 100;
    pub const ENTRY_TTL_SECONDS: u64 = 6 * 60 * 60;
    pub const CALL_CONTEXT_MAILBOX_SIZE: usize = 1000;
    pub const HEALTH_MAILBOX_SIZE: usize = 100;
    pub const MEMORY_MAX_CAPACITY: u64 = 100_000;
    pub const BIND_ADDRESS: &str = "0.0.0.0:8080";
    pub const REDIS_URL: &str = "redis://localhost:6379";
}

/// Environment variables consulted at startup
pub mod env {
    pub const CONFIG_PATH: &str = "ARI_PROXY_CONFIG";
    pub const ENVIRONMENT: &str = "ARI_PROXY_ENV";
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
}
