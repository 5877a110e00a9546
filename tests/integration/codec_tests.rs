//! Round-trip and edge-case coverage for both covert encodings.

use zoneline::codec::tables::CHAR_TOKENS;
use zoneline::codec::{chunked, substitution};
use zoneline::errors::AppError;

#[test]
fn substitution_round_trips_supported_text() {
    let text = "Hello, World. tz sync 123";
    let tokens = substitution::encode(text);
    assert_eq!(tokens.len(), text.chars().count());
    assert_eq!(substitution::decode(&tokens), text);
}

#[test]
fn substitution_round_trips_every_table_character() {
    let text: String = CHAR_TOKENS.iter().map(|&(ch, _)| ch).collect();
    assert_eq!(substitution::decode(&substitution::encode(&text)), text);
}

#[test]
fn substitution_flattens_unsupported_chars_to_space() {
    // '!' has no table entry; it encodes through the space fallback and
    // comes back as a space, not the original character.
    assert_eq!(substitution::decode(&substitution::encode("a!b")), "a b");
}

#[test]
fn substitution_decode_drops_unknown_tokens() {
    let mut tokens = substitution::encode("hi");
    tokens.insert(1, "Mars/Olympus_Mons".to_owned());
    assert_eq!(substitution::decode(&tokens), "hi");
}

#[test]
fn substitution_decode_is_case_insensitive() {
    let tokens = vec!["AMERICA/TAIPEI".to_owned(), "europe/helsinki".to_owned()];
    assert_eq!(substitution::decode(&tokens), "th");
}

#[test]
fn chunk_round_trips_short_text() {
    let text = "hi";
    assert_eq!(chunked::decode(&chunked::encode(text).unwrap()).unwrap(), text);
}

#[test]
fn chunk_round_trips_empty_text() {
    assert_eq!(chunked::decode(&chunked::encode("").unwrap()).unwrap(), "");
}

#[test]
fn chunk_round_trips_long_text() {
    let text = "uptime report line\n".repeat(60);
    assert_eq!(chunked::decode(&chunked::encode(&text).unwrap()).unwrap(), text);
}

#[test]
fn chunk_round_trips_unicode() {
    let text = "čau světe 🌍 — доклад §42";
    assert_eq!(chunked::decode(&chunked::encode(text).unwrap()).unwrap(), text);
}

#[test]
fn chunk_decode_ignores_unknown_keys() {
    let text = "a".repeat(150);
    let encoded = chunked::encode(&text).unwrap();

    let mut object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&encoded).unwrap();
    object.insert("Mars/Olympus_Mons".to_owned(), serde_json::json!(["zzzz"]));
    let tampered = serde_json::to_string(&object).unwrap();

    assert_eq!(chunked::decode(&tampered).unwrap(), text);
}

#[test]
fn chunk_decode_with_only_unknown_keys_yields_empty() {
    let decoded = chunked::decode(r#"{"Mars/Olympus_Mons": ["QUFB"]}"#).unwrap();
    assert_eq!(decoded, "");
}

#[test]
fn chunk_decode_rejects_malformed_objects() {
    assert!(matches!(chunked::decode("not json"), Err(AppError::Codec(_))));
    assert!(matches!(chunked::decode(r#"{"UTC": "flat"}"#), Err(AppError::Codec(_))));
}

#[test]
fn chunk_decode_rejects_invalid_base64() {
    let err = chunked::decode(r#"{"UTC": ["@@not base64@@"]}"#);
    assert!(matches!(err, Err(AppError::Codec(_))));
}

#[test]
fn chunk_decode_enforces_the_visit_ceiling() {
    // 200 fragments piled on one token force the round-robin walk through
    // a near-full idle cycle per fragment, blowing the 10 000-visit bound.
    let fragments: Vec<&str> = std::iter::repeat("QUFB").take(200).collect();
    let pathological = serde_json::json!({ "UTC": fragments }).to_string();

    assert!(matches!(
        chunked::decode(&pathological),
        Err(AppError::DecodeOverrun(_))
    ));
}
