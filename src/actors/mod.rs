//! # Lightweight Actors
//!
//! Each stateful component (the call context provider, the health aggregator)
//! is a single owner of its state. Requests arrive through a bounded mpsc
//! mailbox in arrival order and carry a oneshot responder for the reply.
//!
//! ```text
//! Handle ──mpsc──→ Actor loop (single owner) ──spawn──→ async work
//!   ↑                                                      │
//!   └──────────────────── oneshot reply ───────────────────┘
//! ```
//!
//! The loop itself never awaits external I/O, so a slow store or subscriber
//! never stops the actor from accepting further requests.

pub mod channels;
pub mod traits;

pub use channels::{
    CallContextCommandReceiver, CallContextCommandSender, ChannelFactory, HealthCommandReceiver,
    HealthCommandSender,
};
pub use traits::{CommandResponder, ProxyActor};
