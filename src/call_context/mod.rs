//! # Call Context Provider
//!
//! Single logical owner of the resourceId → callContext namespace. Two
//! retrieval policies sit on top of the backing store:
//!
//! - `LOOKUP_ONLY`: read the store, fail with a lookup error on a miss
//! - `CREATE_IF_MISSING`: use the caller's hint, else the stored value, else a
//!   freshly generated UUID; new values are replied first and persisted after
//!
//! ## Concurrency note
//!
//! The create-if-missing read-then-write is not atomic. Two concurrent
//! requests for the same unmapped resource id can each generate a token; the
//! last write wins and the other caller holds a value the store no longer has.
//! This is kept as documented behavior (see DESIGN.md).
//!
//! Writes themselves are applied in the order their commands arrived.

pub mod actor;
pub mod commands;
pub mod handle;
pub mod persistence;
pub mod types;

pub use actor::CallContextProviderActor;
pub use commands::CallContextCommand;
pub use handle::CallContextProviderHandle;
pub use persistence::PersistentCache;
pub use types::{
    CallContextProvided, CallContextRegistered, CallContextStats, ProvideCallContext,
    ProviderPolicy, RegisterCallContext,
};
