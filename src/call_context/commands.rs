//! # Call Context Command Types
//!
//! Every command carries its own responder; the provider answers on it once
//! the relevant store operation has completed (or, for the write-after-reply
//! paths, before persistence finishes).

use crate::actors::CommandResponder;
use crate::health::HealthReport;

use super::types::{
    CallContextProvided, CallContextRegistered, CallContextStats, ProvideCallContext,
    RegisterCallContext,
};

#[derive(Debug)]
pub enum CallContextCommand {
    /// Unconditionally write the mapping, reply once the write is confirmed
    Register {
        request: RegisterCallContext,
        resp: CommandResponder<CallContextRegistered>,
    },
    /// Resolve a call context under the request's policy
    Provide {
        request: ProvideCallContext,
        resp: CommandResponder<CallContextProvided>,
    },
    /// Lightweight self-check against the store
    ProvideHealthReport {
        resp: CommandResponder<HealthReport>,
    },
    GetStats {
        resp: CommandResponder<CallContextStats>,
    },
    /// Stop the processing loop; in-flight store work still completes
    Shutdown { resp: CommandResponder<()> },
}

impl CallContextCommand {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            CallContextCommand::Register { .. } => "register",
            CallContextCommand::Provide { .. } => "provide",
            CallContextCommand::ProvideHealthReport { .. } => "provide_health_report",
            CallContextCommand::GetStats { .. } => "get_stats",
            CallContextCommand::Shutdown { .. } => "shutdown",
        }
    }
}
