//! Request and reply types of the call context provider

use serde::{Deserialize, Serialize};

/// Retrieval policy attached to each provide request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderPolicy {
    /// Fail on a miss
    LookupOnly,
    /// Generate and persist on a miss
    CreateIfMissing,
}

impl std::fmt::Display for ProviderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderPolicy::LookupOnly => write!(f, "LOOKUP_ONLY"),
            ProviderPolicy::CreateIfMissing => write!(f, "CREATE_IF_MISSING"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCallContext {
    pub resource_id: String,
    pub call_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvideCallContext {
    pub resource_id: String,
    pub policy: ProviderPolicy,
    /// Context already extracted by the caller (e.g. from channel variables)
    pub call_context_hint: Option<String>,
}

impl ProvideCallContext {
    pub fn lookup_only(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            policy: ProviderPolicy::LookupOnly,
            call_context_hint: None,
        }
    }

    pub fn create_if_missing(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            policy: ProviderPolicy::CreateIfMissing,
            call_context_hint: None,
        }
    }

    pub fn with_hint(mut self, call_context: impl Into<String>) -> Self {
        self.call_context_hint = Some(call_context.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContextRegistered {
    pub resource_id: String,
    pub call_context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContextProvided {
    pub call_context: String,
}

/// Process-local counters of the provider's work
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContextStats {
    pub registrations: u64,
    pub lookups_served: u64,
    pub contexts_generated: u64,
    pub hints_accepted: u64,
    pub lookup_misses: u64,
    pub store_errors: u64,
    /// Write-after-reply persistence attempts that failed
    pub persistence_failures: u64,
}
