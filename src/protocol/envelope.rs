//! The shared wire envelope and its construction/parsing rules.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::{self, SUBSTITUTION_LIMIT};
use crate::protocol::action::Action;
use crate::{AppError, Result};

/// The single wire-level payload shape shared by commands and responses.
///
/// Serialized as a flat UTF-8 JSON object; only non-null keys are emitted.
/// Unknown top-level keys fail the parse, so foreign publishers on the
/// topic never get mistaken for channel traffic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Camouflage timestamp. Always stamped on outbound messages, never
    /// semantically meaningful; inbound parsing tolerates its absence.
    #[serde(default)]
    pub decorative_timestamp: String,
    /// Agent's self-chosen identifier; only on agent → controller traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Action token; presence plus validity marks the envelope a command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_marker: Option<String>,
    /// Substitution-encoded hidden text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_payload: Option<Vec<String>>,
    /// Chunk-distribution-encoded hidden text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_payload: Option<String>,
}

impl Envelope {
    /// Fresh envelope carrying only a plausible local-time stamp.
    fn stamped() -> Self {
        Self {
            decorative_timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string(),
            ..Self::default()
        }
    }

    /// Build a command envelope, hiding `argument` when present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Codec`] if the argument cannot be encoded.
    pub fn command(action: Action, argument: Option<&str>) -> Result<Self> {
        let mut envelope = Self::stamped();
        envelope.action_marker = Some(action.token().to_owned());
        envelope.attach_message(argument)?;
        Ok(envelope)
    }

    /// Build a response envelope carrying this agent's identity.
    ///
    /// Responses never carry an action marker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Codec`] if the message cannot be encoded.
    pub fn response(identity: &str, message: Option<&str>) -> Result<Self> {
        let mut envelope = Self::stamped();
        envelope.identity = Some(identity.to_owned());
        envelope.attach_message(message)?;
        Ok(envelope)
    }

    /// Hide `message` in the envelope, choosing the encoding by length.
    ///
    /// Both hidden-message slots are reset first, so at most one is ever
    /// populated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Codec`] if chunk encoding fails.
    pub fn attach_message(&mut self, message: Option<&str>) -> Result<()> {
        self.short_payload = None;
        self.long_payload = None;
        let Some(message) = message else {
            return Ok(());
        };
        if message.chars().count() <= SUBSTITUTION_LIMIT {
            self.short_payload = Some(codec::substitution::encode(message));
        } else {
            self.long_payload = Some(codec::chunked::encode(message)?);
        }
        Ok(())
    }

    /// Parse wire bytes into an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MalformedEnvelope`] for non-UTF-8 bytes, invalid
    /// JSON, or a shape with unknown top-level fields.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload).map_err(|err| AppError::MalformedEnvelope(err.to_string()))
    }

    /// Serialize to compact wire JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Codec`] if serialization fails.
    pub fn to_wire(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| AppError::Codec(err.to_string()))
    }

    /// Recover the hidden message, if either payload slot is populated.
    ///
    /// An undecodable payload is reported as no message at all: on this
    /// channel an unreadable secret is indistinguishable from noise.
    #[must_use]
    pub fn hidden_message(&self) -> Option<String> {
        if let Some(serialized) = &self.long_payload {
            return match codec::chunked::decode(serialized) {
                Ok(message) => Some(message),
                Err(err) => {
                    trace!(%err, "dropping undecodable long payload");
                    None
                }
            };
        }
        self.short_payload.as_deref().map(codec::substitution::decode)
    }

    /// Resolve the action marker against the action table.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.action_marker.as_deref().and_then(Action::from_token)
    }
}
