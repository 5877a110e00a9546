//! External command execution collaborator.
//!
//! Runs a program under a hard deadline and captures its output. Timeouts
//! and missing binaries are recoverable outcomes, not errors: the agent
//! reports them back to the controller as response text.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::{AppError, Result};

/// Captured output of a completed process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Captured stdout, lossily decoded.
    pub stdout: String,
    /// Captured stderr, lossily decoded.
    pub stderr: String,
    /// Process exit code; -1 when terminated by a signal.
    pub exit_code: i32,
}

/// Outcome of one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The process ran to completion within the deadline.
    Completed(CommandOutput),
    /// The deadline expired; the child was killed.
    TimedOut,
    /// The program does not exist on this host.
    NotFound,
}

/// Run `program` with `args`, enforcing `deadline`.
///
/// The child is spawned with `kill_on_drop`, so abandoning the wait on
/// timeout also reaps the process.
///
/// # Errors
///
/// Returns [`AppError::Exec`] only for unexpected spawn or wait failures;
/// timeouts and missing binaries come back as [`ExecOutcome`] variants.
pub async fn run(program: &str, args: &[String], deadline: Duration) -> Result<ExecOutcome> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(deadline, command.output()).await {
        Err(_) => Ok(ExecOutcome::TimedOut),
        Ok(Err(err)) if err.kind() == ErrorKind::NotFound => Ok(ExecOutcome::NotFound),
        Ok(Err(err)) => Err(AppError::Exec(format!("{program}: {err}"))),
        Ok(Ok(output)) => Ok(ExecOutcome::Completed(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })),
    }
}
