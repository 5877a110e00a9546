//! The fixed action enumeration and its token bindings.

use std::fmt::{Display, Formatter};

use crate::{AppError, Result};

/// The six recognized controller actions.
///
/// Each action is bound 1:1 to a token in the action table; the binding is
/// a process-wide constant identical on every participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Ask every listening agent for a presence beacon.
    ListPeers,
    /// List login sessions on the agent host.
    ListSessions,
    /// List the contents of a directory on the agent host.
    ListDirectory,
    /// Report the user the agent runs as.
    Whoami,
    /// Retrieve a file from the agent host.
    FetchFile,
    /// Execute a binary on the agent host.
    RunBinary,
}

impl Action {
    /// Every action, in menu order.
    pub const ALL: [Self; 6] = [
        Self::ListPeers,
        Self::ListSessions,
        Self::ListDirectory,
        Self::Whoami,
        Self::FetchFile,
        Self::RunBinary,
    ];

    /// Wire token bound to this action.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::ListPeers => "America/New_York",
            Self::ListSessions => "America/Los_Angeles",
            Self::ListDirectory => "America/Chicago",
            Self::Whoami => "Europe/London",
            Self::FetchFile => "Europe/Paris",
            Self::RunBinary => "Europe/Berlin",
        }
    }

    /// Resolve a wire token, case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.token().eq_ignore_ascii_case(token))
    }

    /// Parse a kebab-case action name, as used on the CLI surface.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidAction`] when `name` is not one of the
    /// six recognized actions.
    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.name() == name)
            .ok_or_else(|| AppError::InvalidAction(name.to_owned()))
    }

    /// Stable kebab-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ListPeers => "list-peers",
            Self::ListSessions => "list-sessions",
            Self::ListDirectory => "list-directory",
            Self::Whoami => "whoami",
            Self::FetchFile => "fetch-file",
            Self::RunBinary => "run-binary",
        }
    }

    /// Whether the action carries a mandatory path argument.
    #[must_use]
    pub fn requires_path(self) -> bool {
        matches!(self, Self::ListDirectory | Self::FetchFile | Self::RunBinary)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
