//! Controller runtime: broadcast commands, gather agent responses.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::aggregator::{AgentReply, ResponseAggregator};
use crate::bus::{BusHandle, BusMessage};
use crate::protocol::action::Action;
use crate::protocol::envelope::Envelope;
use crate::protocol::role::{classify, InboundRole};
use crate::Result;

/// Controller half of the channel: issues commands, collects replies.
pub struct Controller {
    topic: String,
    bus: BusHandle,
    aggregator: Arc<ResponseAggregator>,
}

impl Controller {
    /// Bind a controller to a bus handle.
    #[must_use]
    pub fn new(topic: String, bus: BusHandle) -> Self {
        Self {
            topic,
            bus,
            aggregator: Arc::new(ResponseAggregator::new()),
        }
    }

    /// Subscribe and spawn the listener that feeds the aggregator.
    ///
    /// Subscription happens before the task starts, so responses to a
    /// command issued right after this call returns are not missed.
    #[must_use]
    pub fn spawn_listener(&self) -> JoinHandle<()> {
        let receiver = self.bus.subscribe();
        let aggregator = Arc::clone(&self.aggregator);
        let topic = self.topic.clone();
        tokio::spawn(listen(receiver, topic, aggregator))
    }

    /// Broadcast a command, opening a fresh collection window.
    ///
    /// The window is cleared before the publish so stale replies to an
    /// earlier command cannot leak into the new one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AppError::Codec`] if the argument cannot be
    /// encoded, or [`crate::AppError::Bus`] if the publish fails.
    pub async fn issue(&self, action: Action, argument: Option<&str>) -> Result<()> {
        let envelope = Envelope::command(action, argument)?;
        self.aggregator.clear().await;
        self.bus.publish(&self.topic, envelope.to_wire()?).await?;
        debug!(%action, "command broadcast");
        Ok(())
    }

    /// Wait out the full window and return the replies it caught.
    pub async fn collect(&self, window: Duration) -> Vec<AgentReply> {
        self.aggregator.collect(window).await
    }

    /// Shared aggregator, for callers wiring their own listeners.
    #[must_use]
    pub fn aggregator(&self) -> Arc<ResponseAggregator> {
        Arc::clone(&self.aggregator)
    }
}

/// Listener loop: everything classified as a Response lands in the
/// aggregator. The controller's own broadcast commands come back on the
/// shared topic and are skipped; noise is dropped silently.
async fn listen(
    mut receiver: broadcast::Receiver<BusMessage>,
    topic: String,
    aggregator: Arc<ResponseAggregator>,
) {
    loop {
        match receiver.recv().await {
            Ok(message) => {
                if message.topic != topic {
                    continue;
                }
                match classify(&message.payload) {
                    InboundRole::Response { identity, message } => {
                        debug!(
                            identity = identity.as_deref().unwrap_or("<unnamed>"),
                            "response collected"
                        );
                        aggregator.append(AgentReply { identity, message }).await;
                    }
                    InboundRole::Command { .. } | InboundRole::Unrecognized => {
                        trace!("ignoring non-response payload");
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "delivery lagged; responses may have been dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Persist one fetched artifact under `dir`.
///
/// The payload is base64-decoded when possible; otherwise the raw text is
/// written as-is (error replies arrive as plain text). File names follow
/// `{identity}_{timestamp}.dat`.
///
/// # Errors
///
/// Returns [`crate::AppError::Io`] when the file cannot be written.
pub fn save_artifact(dir: &Path, identity: Option<&str>, payload: &str) -> Result<PathBuf> {
    let bytes = BASE64
        .decode(payload.as_bytes())
        .unwrap_or_else(|_| payload.as_bytes().to_vec());
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let name = format!("{}_{stamp}.dat", identity.unwrap_or("agent"));
    let target = dir.join(name);
    std::fs::write(&target, bytes)?;
    Ok(target)
}
