//! # Persistent Store Client
//!
//! Durable key-value backend holding the resourceId → callContext mapping.
//!
//! ## Architecture
//!
//! ```text
//! StoreProvider (enum)            <- backend chosen from configuration
//!   ├── Redis(RedisStoreService)  <- ConnectionManager-based async Redis
//!   └── Memory(MemoryStoreService) <- moka in-process cache (single instance, tests)
//! ```
//!
//! The store is opaque to the rest of the crate: only `get`, `set` and
//! `health_check` are used, and only the call context provider calls them.

pub mod errors;
pub mod provider;
pub mod providers;
pub mod traits;

pub use errors::{StoreError, StoreResult};
pub use provider::StoreProvider;
pub use providers::{MemoryStoreService, RedisStoreService};
pub use traits::StoreService;
