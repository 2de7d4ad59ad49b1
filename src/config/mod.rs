//! # Proxy Configuration
//!
//! TOML-based configuration for the call context provider, the backing store,
//! the health surface and logging. Every section has defaults, so an absent
//! configuration file yields a runnable in-memory setup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ari_proxy_core::config::ProxyConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads ARI_PROXY_CONFIG if set, defaults otherwise
//! let config = ProxyConfig::load()?;
//! println!("health surface on {}", config.health.bind_address);
//! # Ok(())
//! # }
//! ```

pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{defaults, DEFAULT_KEY_PREFIX};
use crate::error::{ProxyError, ProxyResult};

pub use loader::{detect_environment, expand_env_vars};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub store: StoreConfig,
    pub call_context: CallContextConfig,
    pub health: HealthConfig,
    pub logging: LoggingConfig,
}

/// Backing store selection and key layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// "redis" or "memory"
    pub backend: String,
    pub key_prefix: String,
    pub entry_ttl_seconds: u64,
    pub redis: Option<RedisConfig>,
    pub memory: Option<MemoryStoreConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            entry_ttl_seconds: defaults::ENTRY_TTL_SECONDS,
            redis: None,
            memory: None,
        }
    }
}

impl StoreConfig {
    pub fn entry_ttl(&self) -> Duration {
        Duration::from_secs(self.entry_ttl_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: defaults::REDIS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MemoryStoreConfig {
    pub max_capacity: u64,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: defaults::MEMORY_MAX_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CallContextConfig {
    pub mailbox_buffer_size: usize,
}

impl Default for CallContextConfig {
    fn default() -> Self {
        Self {
            mailbox_buffer_size: defaults::CALL_CONTEXT_MAILBOX_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    pub bind_address: String,
    pub subscriber_timeout_ms: u64,
    pub mailbox_buffer_size: usize,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_string(),
            subscriber_timeout_ms: defaults::SUBSCRIBER_TIMEOUT_MS,
            mailbox_buffer_size: defaults::HEALTH_MAILBOX_SIZE,
        }
    }
}

impl HealthConfig {
    pub fn subscriber_timeout(&self) -> Duration {
        Duration::from_millis(self.subscriber_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Overrides the environment default filter; RUST_LOG still wins
    pub level: Option<String>,
    pub json: bool,
}

impl ProxyConfig {
    /// Parse and validate configuration from TOML text
    ///
    /// `${VAR}` and `${VAR:-default}` references inside string values are
    /// expanded before deserialization.
    pub fn from_toml_str(contents: &str) -> ProxyResult<Self> {
        let config: ProxyConfig = loader::parse_with_env_substitution(contents, "<inline>")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProxyResult<()> {
        match self.store.backend.as_str() {
            "redis" | "memory" => {}
            other => {
                return Err(ProxyError::ConfigurationError(format!(
                    "Unknown store backend '{other}', expected 'redis' or 'memory'"
                )))
            }
        }

        if self.store.key_prefix.trim().is_empty() {
            return Err(ProxyError::ConfigurationError(
                "store.key_prefix must not be empty".to_string(),
            ));
        }

        if self.store.entry_ttl_seconds == 0 {
            return Err(ProxyError::ConfigurationError(
                "store.entry_ttl_seconds must be greater than zero".to_string(),
            ));
        }

        if self.health.subscriber_timeout_ms == 0 {
            return Err(ProxyError::ConfigurationError(
                "health.subscriber_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.call_context.mailbox_buffer_size == 0 || self.health.mailbox_buffer_size == 0 {
            return Err(ProxyError::ConfigurationError(
                "mailbox_buffer_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
