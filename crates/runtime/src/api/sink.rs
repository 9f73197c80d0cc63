//! Asynchronous seam toward the realtime transport.
//!
//! The worker hands every outbound [`NetMessage`] to an [`OutboundSink`]. The
//! transport itself (websocket, data channel, test harness) lives outside this
//! crate; these implementations cover in-process wiring and tests.
use async_trait::async_trait;
use tokio::sync::mpsc;

use jumpjump_core::NetMessage;

use super::errors::SinkError;

/// Destination for messages addressed to the remote peer.
///
/// Implementations must preserve call order; the sync protocol has no
/// sequence numbers and relies on in-order delivery.
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn send(&self, message: NetMessage) -> Result<(), SinkError>;
}

/// Discards everything. Used when no transport is attached.
pub struct NullSink;

#[async_trait]
impl OutboundSink for NullSink {
    async fn send(&self, _message: NetMessage) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Forwards messages into a tokio channel, e.g. to another in-process runtime.
pub struct ChannelSink {
    tx: mpsc::Sender<NetMessage>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<NetMessage>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiving end.
    pub fn pair(capacity: usize) -> (Self, mpsc::Receiver<NetMessage>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl OutboundSink for ChannelSink {
    async fn send(&self, message: NetMessage) -> Result<(), SinkError> {
        self.tx.send(message).await.map_err(|_| SinkError::Closed)
    }
}
