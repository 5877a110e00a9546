//! Chunk-distribution encoding for long hidden text.
//!
//! The input is base64-encoded, split into fragments of random length, and
//! fragment `i` is filed under the token at position `i % T` of the
//! canonical token order (T = table size). The result serializes as a JSON
//! object mapping tokens to ordered fragment lists, which passes for
//! timezone configuration data on the wire.
//!
//! Decoding replays the identical round-robin walk: visit token
//! `i % T` starting from 0, consume that token's next stored fragment when
//! one remains, advance either way. Because encoding assigned fragments in
//! exactly that order, replay reconstructs the original fragment sequence.
//! No other reconstruction heuristic is valid.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;

use super::tables::TOKEN_ORDER;
use crate::{AppError, Result};

/// Inclusive fragment-size bounds.
const MIN_FRAGMENT: usize = 7;
const MAX_FRAGMENT: usize = 20;

/// Hard ceiling on token visits during decode; malformed input that never
/// drains must error out instead of spinning.
const VISIT_CEILING: usize = 10_000;

/// Encode `text` into the serialized token → fragment-list object.
///
/// # Errors
///
/// Returns [`AppError::Codec`] if the mapping cannot be serialized.
pub fn encode(text: &str) -> Result<String> {
    let encoded = BASE64.encode(text.as_bytes());
    let order = &*TOKEN_ORDER;
    let mut rng = rand::thread_rng();

    let mut fragments: HashMap<&str, Vec<String>> = HashMap::new();
    let mut start = 0;
    let mut index = 0;
    while start < encoded.len() {
        // Base64 output is ASCII, so byte ranges are char-safe.
        let end = usize::min(start + rng.gen_range(MIN_FRAGMENT..=MAX_FRAGMENT), encoded.len());
        fragments
            .entry(order[index % order.len()])
            .or_default()
            .push(encoded[start..end].to_owned());
        start = end;
        index += 1;
    }

    serde_json::to_string(&fragments).map_err(|err| AppError::Codec(err.to_string()))
}

/// Decode a serialized token → fragment-list object back to text.
///
/// Keys outside the token table are unreachable by the round-robin walk
/// and are ignored. Token lookup is case-insensitive.
///
/// # Errors
///
/// Returns [`AppError::Codec`] for a malformed object, invalid base64, or
/// non-UTF-8 payload bytes, and [`AppError::DecodeOverrun`] when the walk
/// exceeds its visit ceiling before draining every fragment.
pub fn decode(serialized: &str) -> Result<String> {
    let parsed: HashMap<String, Vec<String>> = serde_json::from_str(serialized)
        .map_err(|err| AppError::Codec(format!("invalid chunk object: {err}")))?;

    let mut lists: HashMap<String, (Vec<String>, usize)> = parsed
        .into_iter()
        .map(|(token, frags)| (token.to_ascii_uppercase(), (frags, 0)))
        .collect();

    let order = &*TOKEN_ORDER;
    let mut remaining: usize = order
        .iter()
        .filter_map(|token| lists.get(&token.to_ascii_uppercase()))
        .map(|(frags, _)| frags.len())
        .sum();

    let mut encoded = String::new();
    let mut visits = 0usize;
    let mut index = 0usize;
    while remaining > 0 {
        if visits >= VISIT_CEILING {
            return Err(AppError::DecodeOverrun(format!(
                "{VISIT_CEILING} token visits spent with {remaining} fragments left"
            )));
        }
        visits += 1;

        let token = order[index % order.len()].to_ascii_uppercase();
        if let Some((frags, cursor)) = lists.get_mut(&token) {
            if *cursor < frags.len() {
                encoded.push_str(&frags[*cursor]);
                *cursor += 1;
                remaining -= 1;
            }
        }
        index += 1;
    }

    let raw = BASE64
        .decode(encoded.as_bytes())
        .map_err(|err| AppError::Codec(format!("invalid base64 payload: {err}")))?;
    String::from_utf8(raw).map_err(|err| AppError::Codec(format!("payload is not utf-8: {err}")))
}
