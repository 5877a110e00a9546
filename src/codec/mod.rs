//! Reversible transforms between plain text and the covert wire fields.
//!
//! Two encodings share the same token vocabulary: symbol substitution for
//! short text (one token per character) and chunk distribution for long
//! text (base64 fragments filed round-robin under the token list). Callers
//! normally go through [`crate::protocol::envelope::Envelope`], which
//! dispatches on [`SUBSTITUTION_LIMIT`].

pub mod chunked;
pub mod substitution;
pub mod tables;

/// Longest hidden text (in characters) the substitution encoding carries;
/// anything longer goes through chunk distribution.
pub const SUBSTITUTION_LIMIT: usize = 100;
