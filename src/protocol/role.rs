//! Stateless message-role classification.

use tracing::trace;

use crate::protocol::action::Action;
use crate::protocol::envelope::Envelope;

/// Terminal classification of one inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRole {
    /// A controller command to execute.
    Command {
        /// Requested action.
        action: Action,
        /// Hidden argument, when one was attached and non-empty.
        argument: Option<String>,
    },
    /// An agent's answer to a previously issued command.
    Response {
        /// Responding agent's self-chosen identifier, when sent.
        identity: Option<String>,
        /// Decoded response payload, when non-empty.
        message: Option<String>,
    },
    /// Noise from an unrelated publisher.
    Unrecognized,
}

/// Classify raw topic bytes as command, response, or noise.
///
/// Predicates run in a fixed order: parse failure first, then a resolvable
/// action marker, then any response evidence (an identity or a non-empty
/// hidden message). Everything else is unrecognized and must be dropped
/// with no reply and no bus-observable side effect — blending into ambient
/// traffic depends on staying silent about payloads we cannot read.
#[must_use]
pub fn classify(payload: &[u8]) -> InboundRole {
    let Ok(envelope) = Envelope::parse(payload) else {
        trace!("unparseable payload ignored");
        return InboundRole::Unrecognized;
    };

    if let Some(action) = envelope.action() {
        let argument = envelope.hidden_message().filter(|text| !text.is_empty());
        return InboundRole::Command { action, argument };
    }

    let message = envelope.hidden_message().filter(|text| !text.is_empty());
    if envelope.identity.is_some() || message.is_some() {
        return InboundRole::Response {
            identity: envelope.identity,
            message,
        };
    }

    trace!("payload matches no channel role");
    InboundRole::Unrecognized
}
