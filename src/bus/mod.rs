//! Minimal publish/subscribe seam the envelopes travel over.
//!
//! Delivery is assumed reliable and ordered per publisher; there is no
//! reconnect or retry here. Two backends produce the same clonable
//! [`BusHandle`]: an in-process loopback ([`memory`]) and a TCP relay
//! client ([`tcp`]), so the agent and controller runtimes stay
//! transport-agnostic.

pub mod memory;
pub mod tcp;

use tokio::sync::{broadcast, mpsc};

use crate::{AppError, Result};

/// One raw message observed on a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    /// Topic the payload was published on.
    pub topic: String,
    /// Raw payload bytes.
    pub payload: Vec<u8>,
}

pub(crate) enum BusCommand {
    Publish(BusMessage),
}

/// Clonable handle to a running bus backend.
///
/// Publishes queue into the backend task over an mpsc channel;
/// subscriptions fan out of a broadcast channel.
#[derive(Debug, Clone)]
pub struct BusHandle {
    cmd_tx: mpsc::Sender<BusCommand>,
    event_tx: broadcast::Sender<BusMessage>,
}

impl BusHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<BusCommand>,
        event_tx: broadcast::Sender<BusMessage>,
    ) -> Self {
        Self { cmd_tx, event_tx }
    }

    /// Publish `payload` on `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Bus`] when the backend task has shut down.
    pub async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.cmd_tx
            .send(BusCommand::Publish(BusMessage {
                topic: topic.to_owned(),
                payload,
            }))
            .await
            .map_err(|_| AppError::Bus("bus backend is gone".into()))
    }

    /// Subscribe to every message the backend observes.
    ///
    /// Topic filtering happens at the receiver. A publisher's own messages
    /// are delivered back to it, exactly as a bus subscription to the same
    /// topic would behave.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.event_tx.subscribe()
    }
}
