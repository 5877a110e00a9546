//! In-process loopback bus for tests and single-process demos.

use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use super::{BusCommand, BusHandle};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// Start a loopback backend and return its handle.
///
/// Every publish is delivered to every subscriber of every clone of the
/// returned handle, including the publisher itself.
#[must_use]
pub fn spawn() -> BusHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

    let events = event_tx.clone();
    tokio::spawn(async move {
        while let Some(BusCommand::Publish(message)) = cmd_rx.recv().await {
            // Send only fails when no subscriber exists; nothing to do then.
            let _ = events.send(message);
        }
        debug!("memory bus drained");
    });

    BusHandle::new(cmd_tx, event_tx)
}
