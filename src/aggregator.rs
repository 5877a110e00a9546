//! Controller-side response collection for one wait window.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

/// One classified agent response within the current wait window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    /// Responding agent's identifier, when it sent one.
    pub identity: Option<String>,
    /// Decoded response payload, when non-empty.
    pub message: Option<String>,
}

/// Collects the responses that follow a broadcast command.
///
/// The collection is the only shared mutable state on the controller.
/// Every read and write goes through the mutex, including the clear that
/// opens a fresh window at command issuance, so a response can never land
/// in a half-cleared window. [`collect`](Self::collect) does not hold the
/// lock while sleeping; it re-acquires only to snapshot.
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    window: Mutex<Vec<AgentReply>>,
}

impl ResponseAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every reply collected so far, opening a fresh window.
    pub async fn clear(&self) {
        self.window.lock().await.clear();
    }

    /// Append a reply to the current window.
    pub async fn append(&self, reply: AgentReply) {
        self.window.lock().await.push(reply);
    }

    /// Snapshot the current window in append order.
    pub async fn snapshot(&self) -> Vec<AgentReply> {
        self.window.lock().await.clone()
    }

    /// Wait out the full `window`, then snapshot whatever arrived.
    ///
    /// The timeout is fixed: collection never ends early, even when every
    /// known agent has already replied — the controller has no notion of
    /// how many agents exist.
    pub async fn collect(&self, window: Duration) -> Vec<AgentReply> {
        sleep(window).await;
        self.snapshot().await
    }
}
