//! Symbol-substitution encoding for short hidden text.
//!
//! One token per input character. Characters outside the table collapse to
//! the space token, so the transform is lossy for out-of-table input.
//! Decoding drops tokens with no inverse entry rather than substituting
//! anything for them — a deliberate, tested choice.

use super::tables::{CHAR_TO_TOKEN, FALLBACK_TOKEN, TOKEN_TO_CHAR};

/// Encode `text` as an ordered token sequence, one token per character.
#[must_use]
pub fn encode(text: &str) -> Vec<String> {
    text.chars()
        .map(|ch| (*CHAR_TO_TOKEN.get(&ch).unwrap_or(&FALLBACK_TOKEN)).to_owned())
        .collect()
}

/// Decode an ordered token sequence back to text.
///
/// Lookup is case-insensitive. Unknown tokens are skipped.
#[must_use]
pub fn decode(tokens: &[String]) -> String {
    tokens
        .iter()
        .filter_map(|token| TOKEN_TO_CHAR.get(&token.to_ascii_uppercase()).copied())
        .collect()
}
