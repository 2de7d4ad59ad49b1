#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # ARI Proxy Core
//!
//! Per-call identity cache and health aggregation for an ARI proxy.
//!
//! ## Overview
//!
//! Every call-scoped resource (a channel, a bridge, a playback) is tagged with
//! a *call context*: an opaque correlation token shared by everything that
//! belongs to the same call. The [`call_context`] provider resolves and
//! persists `resourceId → callContext` mappings in an external store, and the
//! [`health`] aggregator collects health reports from subscribed components
//! and serves them over HTTP.
//!
//! ## Module Organization
//!
//! - [`call_context`] - Call context provider actor, handle and persistence
//! - [`health`] - Health reports, subscription registry and aggregator actor
//! - [`store`] - Backing store abstraction (Redis, in-memory)
//! - [`actors`] - Actor trait and typed mailboxes
//! - [`web`] - `GET /health` and `GET /health/smoke`
//! - [`bootstrap`] - Wires everything together
//! - [`config`] - TOML configuration with environment substitution
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ari_proxy_core::bootstrap::ProxyBootstrap;
//! use ari_proxy_core::call_context::ProvideCallContext;
//! use ari_proxy_core::config::ProxyConfig;
//!
//! # async fn example() -> ari_proxy_core::ProxyResult<()> {
//! let mut system = ProxyBootstrap::bootstrap(ProxyConfig::load()?).await?;
//!
//! let provided = system
//!     .call_context
//!     .provide(ProvideCallContext::create_if_missing("channel-1"))
//!     .await?;
//! println!("call context: {}", provided.call_context);
//!
//! system.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod actors;
pub mod bootstrap;
pub mod call_context;
pub mod config;
pub mod constants;
pub mod error;
pub mod health;
pub mod logging;
pub mod macros;
pub mod store;
pub mod web;

pub use bootstrap::{ProxyBootstrap, ProxySystemHandle};
pub use call_context::{
    CallContextProvided, CallContextProviderActor, CallContextProviderHandle,
    CallContextRegistered, ProvideCallContext, ProviderPolicy,
};
pub use config::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use health::{HealthAggregatorActor, HealthAggregatorHandle, HealthReport, HealthReporter};
pub use store::{StoreProvider, StoreService};
