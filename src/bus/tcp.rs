//! TCP relay client backend.
//!
//! Frames are one JSON object per line: `{"topic": ..., "payload": ...}`,
//! with the payload carried as UTF-8 text (envelopes are JSON already).
//! The relay fans every frame out to every connected client; filtering by
//! topic is the receiver's job. There is no reconnect: the transport is
//! treated as reliable, and a dropped relay connection ends the backend
//! tasks.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use super::{BusCommand, BusHandle, BusMessage};
use crate::{AppError, Result};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

/// One relay frame, line-delimited on the wire.
#[derive(Debug, Serialize, Deserialize)]
struct RelayFrame {
    topic: String,
    payload: String,
}

/// Connect to a relay and return a bus handle over the connection.
///
/// # Errors
///
/// Returns [`AppError::Bus`] when the relay is unreachable.
pub async fn connect(addr: &str) -> Result<BusHandle> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|err| AppError::Bus(format!("cannot reach relay at {addr}: {err}")))?;
    let (read_half, mut write_half) = stream.into_split();

    let (cmd_tx, mut cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

    // Writer task: one frame per queued publish.
    tokio::spawn(async move {
        while let Some(BusCommand::Publish(message)) = cmd_rx.recv().await {
            let frame = RelayFrame {
                topic: message.topic,
                payload: String::from_utf8_lossy(&message.payload).into_owned(),
            };
            let Ok(mut line) = serde_json::to_string(&frame) else {
                continue;
            };
            line.push('\n');
            if let Err(err) = write_half.write_all(line.as_bytes()).await {
                warn!(%err, "relay write failed; publish task stopping");
                break;
            }
        }
    });

    // Reader task: parse inbound lines and fan them out to subscribers.
    let events = event_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<RelayFrame>(trimmed) {
                        Ok(frame) => {
                            let _ = events.send(BusMessage {
                                topic: frame.topic,
                                payload: frame.payload.into_bytes(),
                            });
                        }
                        Err(err) => debug!(%err, "relay line was not a frame"),
                    }
                }
                Ok(None) => {
                    debug!("relay closed the connection");
                    break;
                }
                Err(err) => {
                    warn!(%err, "relay read failed");
                    break;
                }
            }
        }
    });

    Ok(BusHandle::new(cmd_tx, event_tx))
}
