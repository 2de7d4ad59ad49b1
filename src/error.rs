//! Error types for the ARI proxy core.
//!

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// LOOKUP_ONLY found no mapping for the resource id
    #[error("Failed to lookup call context for resource id {resource_id}...")]
    LookupError { resource_id: String },
    #[error("Store error: {0}")]
    StoreError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Mailbox closed or reply channel dropped before a response was sent
    #[error("Channel error: {0}")]
    ChannelError(String),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Failed to bind to {address}: {reason}")]
    BindError { address: String, reason: String },
}

impl ProxyError {
    pub fn lookup(resource_id: impl Into<String>) -> Self {
        ProxyError::LookupError {
            resource_id: resource_id.into(),
        }
    }

    /// Whether the caller may reasonably retry with a different policy
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ProxyError::LookupError { .. })
    }
}

impl From<StoreError> for ProxyError {
    fn from(error: StoreError) -> Self {
        ProxyError::StoreError(error.to_string())
    }
}

impl From<toml::de::Error> for ProxyError {
    fn from(error: toml::de::Error) -> Self {
        ProxyError::ConfigurationError(format!("TOML parse error: {error}"))
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for ProxyError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        ProxyError::ChannelError("actor mailbox closed".to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for ProxyError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        ProxyError::ChannelError("reply channel dropped before a response was sent".to_string())
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;
