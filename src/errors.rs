//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
///
/// Failures tied to a single inbound bus message are never propagated
/// across the dispatch boundary; the receive loops contain them so one
/// malformed payload cannot disrupt later traffic.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Bus transport failure (connect, publish, or relay I/O).
    Bus(String),
    /// Inbound bytes could not be parsed into the envelope shape.
    MalformedEnvelope(String),
    /// Requested action is not part of the fixed action enumeration.
    InvalidAction(String),
    /// Hidden-payload encoding or decoding failure.
    Codec(String),
    /// Chunk-distribution decode exceeded its iteration safety ceiling.
    DecodeOverrun(String),
    /// Action requires a path argument and none was attached.
    MissingArgument(String),
    /// External command execution failed in an unexpected way.
    Exec(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Bus(msg) => write!(f, "bus: {msg}"),
            Self::MalformedEnvelope(msg) => write!(f, "malformed envelope: {msg}"),
            Self::InvalidAction(msg) => write!(f, "invalid action: {msg}"),
            Self::Codec(msg) => write!(f, "codec: {msg}"),
            Self::DecodeOverrun(msg) => write!(f, "decode overrun: {msg}"),
            Self::MissingArgument(msg) => write!(f, "missing argument: {msg}"),
            Self::Exec(msg) => write!(f, "exec: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
