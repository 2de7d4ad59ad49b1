//! # Semantic NewType Channel Wrappers
//!
//! Strongly-typed mailboxes for the proxy's actors. Each channel type encodes
//! its purpose in the type system, so a health command can never be sent to
//! the call context provider's mailbox.

use tokio::sync::mpsc;

use crate::call_context::CallContextCommand;
use crate::health::HealthCommand;

// ============================================================================
// Call Context Command Channel Types
// ============================================================================

/// Strongly-typed sender for call context commands.
#[derive(Debug, Clone)]
pub struct CallContextCommandSender(pub(crate) mpsc::Sender<CallContextCommand>);

/// Strongly-typed receiver for call context commands.
#[derive(Debug)]
pub struct CallContextCommandReceiver(pub(crate) mpsc::Receiver<CallContextCommand>);

impl CallContextCommandSender {
    pub async fn send(
        &self,
        command: CallContextCommand,
    ) -> Result<(), mpsc::error::SendError<CallContextCommand>> {
        self.0.send(command).await
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    /// Get the channel capacity.
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl CallContextCommandReceiver {
    pub async fn recv(&mut self) -> Option<CallContextCommand> {
        self.0.recv().await
    }

    /// Close the receiver, preventing further sends.
    pub fn close(&mut self) {
        self.0.close()
    }
}

// ============================================================================
// Health Command Channel Types
// ============================================================================

/// Strongly-typed sender for health aggregator commands.
#[derive(Debug, Clone)]
pub struct HealthCommandSender(pub(crate) mpsc::Sender<HealthCommand>);

/// Strongly-typed receiver for health aggregator commands.
#[derive(Debug)]
pub struct HealthCommandReceiver(pub(crate) mpsc::Receiver<HealthCommand>);

impl HealthCommandSender {
    pub async fn send(
        &self,
        command: HealthCommand,
    ) -> Result<(), mpsc::error::SendError<HealthCommand>> {
        self.0.send(command).await
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

impl HealthCommandReceiver {
    pub async fn recv(&mut self) -> Option<HealthCommand> {
        self.0.recv().await
    }

    pub fn close(&mut self) {
        self.0.close()
    }
}

// ============================================================================
// Channel Factory
// ============================================================================

/// Factory for creating strongly-typed channel pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelFactory;

impl ChannelFactory {
    /// Bounded mailbox for the call context provider
    pub fn call_context_command_channel(
        buffer_size: usize,
    ) -> (CallContextCommandSender, CallContextCommandReceiver) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (CallContextCommandSender(tx), CallContextCommandReceiver(rx))
    }

    /// Bounded mailbox for the health aggregator
    pub fn health_command_channel(
        buffer_size: usize,
    ) -> (HealthCommandSender, HealthCommandReceiver) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (HealthCommandSender(tx), HealthCommandReceiver(rx))
    }
}
