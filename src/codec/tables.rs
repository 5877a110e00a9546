//! Static token tables shared by every channel participant.
//!
//! Both tables are process-wide constants and must be byte-identical on
//! every controller and agent. The entry order of [`CHAR_TOKENS`] is load
//! bearing: its value column, in order, is the canonical token list the
//! chunk-distribution codec walks round-robin.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Character-to-token substitution table, in canonical order.
pub const CHAR_TOKENS: &[(char, &str)] = &[
    ('a', "America/Argentina/Buenos_Aires"),
    ('b', "America/Sao_Paulo"),
    ('c', "America/Toronto"),
    ('d', "Europe/Dublin"),
    ('e', "Europe/Madrid"),
    ('f', "Europe/Paris"),
    ('g', "Europe/Athens"),
    ('h', "Europe/Helsinki"),
    ('i', "Asia/Jerusalem"),
    ('j', "Asia/Kolkata"),
    ('k', "Asia/Kathmandu"),
    ('l', "America/Lima"),
    ('m', "Europe/Moscow"),
    ('n', "America/Denver"),
    ('o', "Australia/Sydney"),
    ('p', "America/Phoenix"),
    ('q', "America/Montevideo"),
    ('r', "America/Recife"),
    ('s', "America/Santiago"),
    ('t', "America/Taipei"),
    ('u', "Australia/Perth"),
    ('v', "America/Vancouver"),
    ('w', "America/Winnipeg"),
    ('x', "Asia/Ho_Chi_Minh"),
    ('y', "Asia/Yekaterinburg"),
    ('z', "Europe/Stockholm"),
    ('A', "America/Anchorage"),
    ('B', "Europe/Berlin"),
    ('C', "America/Chicago"),
    ('D', "Asia/Dubai"),
    ('E', "Europe/Edinburgh"),
    ('F', "America/Fortaleza"),
    ('G', "Europe/Gibraltar"),
    ('H', "Pacific/Honolulu"),
    ('I', "Asia/Istanbul"),
    ('J', "Asia/Jakarta"),
    ('K', "Europe/Kiev"),
    ('L', "Europe/London"),
    ('M', "America/Mexico_City"),
    ('N', "America/New_York"),
    ('O', "Europe/Oslo"),
    ('P', "Europe/Prague"),
    ('Q', "America/Quebec"),
    ('R', "Europe/Rome"),
    ('S', "Asia/Shanghai"),
    ('T', "Asia/Tokyo"),
    ('U', "Asia/Ulaanbaatar"),
    ('V', "Europe/Vienna"),
    ('W', "Europe/Warsaw"),
    ('X', "America/Cancun"),
    ('Y', "America/Yakutat"),
    ('Z', "Europe/Zurich"),
    (',', "Africa/Johannesburg"),
    (' ', "Africa/Lagos"),
    ('.', "Africa/Kenya"),
    ('/', "America/Los_Angeles"),
    ('~', "Europe/Tallinn"),
    ('0', "UTC"),
    ('1', "Africa/Casablanca"),
    ('2', "Africa/Cairo"),
    ('3', "Africa/Nairobi"),
    ('4', "Asia/Baku"),
    ('5', "Asia/Karachi"),
    ('6', "Asia/Dhaka"),
    ('7', "Asia/Bangkok"),
    ('8', "Asia/Singapore"),
    ('9', "Asia/Seoul"),
];

/// Token standing in for characters without a table entry (the space
/// entry). Encoding through it is lossy on purpose.
pub const FALLBACK_TOKEN: &str = "Africa/Lagos";

/// Forward lookup: character → token.
pub static CHAR_TO_TOKEN: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| CHAR_TOKENS.iter().copied().collect());

/// Inverse lookup: uppercased token → character.
pub static TOKEN_TO_CHAR: Lazy<HashMap<String, char>> = Lazy::new(|| {
    CHAR_TOKENS
        .iter()
        .map(|&(ch, token)| (token.to_ascii_uppercase(), ch))
        .collect()
});

/// Canonical ordered token list for chunk distribution.
pub static TOKEN_ORDER: Lazy<Vec<&'static str>> =
    Lazy::new(|| CHAR_TOKENS.iter().map(|&(_, token)| token).collect());
