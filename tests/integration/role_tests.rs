//! Classifier coverage: one terminal role per payload, silence for noise.

use zoneline::codec::substitution;
use zoneline::protocol::action::Action;
use zoneline::protocol::envelope::Envelope;
use zoneline::protocol::role::{classify, InboundRole};

fn wire(envelope: &Envelope) -> Vec<u8> {
    envelope.to_wire().unwrap()
}

#[test]
fn commands_classify_with_their_argument() {
    let envelope = Envelope::command(Action::ListDirectory, Some("/var/log")).unwrap();
    assert_eq!(
        classify(&wire(&envelope)),
        InboundRole::Command {
            action: Action::ListDirectory,
            argument: Some("/var/log".to_owned()),
        }
    );
}

#[test]
fn identity_alone_classifies_as_response() {
    let envelope = Envelope::response("probe-7", None).unwrap();
    assert_eq!(
        classify(&wire(&envelope)),
        InboundRole::Response {
            identity: Some("probe-7".to_owned()),
            message: None,
        }
    );
}

#[test]
fn hidden_message_alone_classifies_as_response() {
    let envelope = Envelope {
        short_payload: Some(substitution::encode("ping")),
        ..Envelope::default()
    };
    assert_eq!(
        classify(&wire(&envelope)),
        InboundRole::Response {
            identity: None,
            message: Some("ping".to_owned()),
        }
    );
}

#[test]
fn undecodable_bytes_never_escape_the_classifier() {
    assert_eq!(classify(&[0xff, 0xfe, 0x00]), InboundRole::Unrecognized);
    assert_eq!(classify(b""), InboundRole::Unrecognized);
    assert_eq!(classify(b"{\"weather\": \"sunny\"}"), InboundRole::Unrecognized);
}

#[test]
fn a_bare_timestamp_is_noise() {
    let envelope = Envelope {
        decorative_timestamp: "2024-06-01T12:00:00+02:00".to_owned(),
        ..Envelope::default()
    };
    assert_eq!(classify(&wire(&envelope)), InboundRole::Unrecognized);
}

#[test]
fn an_empty_hidden_message_is_not_response_evidence() {
    let envelope = Envelope {
        short_payload: Some(Vec::new()),
        ..Envelope::default()
    };
    assert_eq!(classify(&wire(&envelope)), InboundRole::Unrecognized);
}

#[test]
fn an_unresolvable_marker_is_not_a_command() {
    // With an identity present the message still counts as a response;
    // without one it is nothing at all.
    let with_identity = Envelope {
        action_marker: Some("Pluto/Lowell".to_owned()),
        identity: Some("probe-2".to_owned()),
        ..Envelope::default()
    };
    assert!(matches!(
        classify(&wire(&with_identity)),
        InboundRole::Response { .. }
    ));

    let marker_only = Envelope {
        action_marker: Some("Pluto/Lowell".to_owned()),
        ..Envelope::default()
    };
    assert_eq!(classify(&wire(&marker_only)), InboundRole::Unrecognized);
}

#[test]
fn command_wins_over_response_evidence() {
    // An envelope that carries both a valid marker and an identity is a
    // command; the predicates run in order.
    let mut envelope = Envelope::command(Action::Whoami, None).unwrap();
    envelope.identity = Some("confused".to_owned());
    assert!(matches!(
        classify(&wire(&envelope)),
        InboundRole::Command { action: Action::Whoami, .. }
    ));
}

#[test]
fn undecodable_long_payload_degrades_to_absent_message() {
    // Valid token key, fragments that are not base64: the hidden message
    // fails to decode, leaving identity as the only response evidence.
    let envelope = Envelope {
        identity: Some("probe-3".to_owned()),
        long_payload: Some(r#"{"UTC": ["@@@@"]}"#.to_owned()),
        ..Envelope::default()
    };
    assert_eq!(
        classify(&wire(&envelope)),
        InboundRole::Response {
            identity: Some("probe-3".to_owned()),
            message: None,
        }
    );
}
