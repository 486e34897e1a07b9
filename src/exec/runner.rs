// src/exec/runner.rs

//! One-shot process runner with combined output capture.

use std::io::Read;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CommandSpec;

/// Why a command run did not succeed.
///
/// The `Display` text is what HTTP clients see when the command printed
/// nothing.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("starting {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("exit status {code}")]
    Exit { code: i32 },

    #[error("signal: {signal}")]
    Signal { signal: i32 },

    #[error("command cancelled")]
    Cancelled,

    #[error("capturing command output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a single command run: captured bytes plus an optional error.
///
/// Output and error are independent; a failed command may still have printed
/// something useful.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub output: Vec<u8>,
    pub error: Option<RunError>,
}

impl ExecutionOutcome {
    pub fn success(output: Vec<u8>) -> Self {
        Self {
            output,
            error: None,
        }
    }

    pub fn failure(output: Vec<u8>, error: RunError) -> Self {
        Self {
            output,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Run `command`, capturing stdout and stderr interleaved in the order the
/// process wrote them.
///
/// If `cancel` fires first the process is killed and the outcome carries
/// [`RunError::Cancelled`] with no output.
pub async fn run_command(command: &CommandSpec, cancel: &CancellationToken) -> ExecutionOutcome {
    info!(cmd = %command, "starting command");

    let outcome = match run_command_inner(command, cancel).await {
        Ok(outcome) => outcome,
        Err(err) => ExecutionOutcome::failure(Vec::new(), err),
    };

    match &outcome.error {
        None => info!(
            cmd = %command,
            bytes = outcome.output.len(),
            "command finished"
        ),
        Some(err) => warn!(
            cmd = %command,
            bytes = outcome.output.len(),
            error = %err,
            "command failed"
        ),
    }

    outcome
}

async fn run_command_inner(
    command: &CommandSpec,
    cancel: &CancellationToken,
) -> Result<ExecutionOutcome, RunError> {
    // Both streams share one pipe so the kernel keeps their relative order.
    let (reader, writer) = std::io::pipe()?;
    let stderr_writer = writer.try_clone()?;

    let mut cmd = Command::new(command.program());
    cmd.args(command.args())
        .stdin(Stdio::null())
        .stdout(writer)
        .stderr(stderr_writer)
        .kill_on_drop(true);

    let spawned = cmd.spawn();
    // The command still owns our copies of the write end; the reader only
    // sees EOF once they are closed.
    drop(cmd);

    let mut child = spawned.map_err(|source| RunError::Spawn {
        program: command.program().to_string(),
        source,
    })?;
    debug!(cmd = %command, pid = ?child.id(), "command spawned");

    let mut collector = tokio::task::spawn_blocking(move || {
        let mut reader = reader;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).map(|_| buf)
    });

    let status = tokio::select! {
        status = child.wait() => status?,

        _ = cancel.cancelled() => {
            info!(cmd = %command, "request cancelled; killing command");
            if let Err(e) = child.kill().await {
                warn!(cmd = %command, error = %e, "failed to kill command on cancellation");
            }
            return Err(RunError::Cancelled);
        }
    };

    // Background children may inherit the pipe and keep it open after the
    // main process has exited, so the read is cancellable as well.
    let output = tokio::select! {
        joined = &mut collector => {
            joined.map_err(|e| RunError::Io(std::io::Error::other(e)))??
        }

        _ = cancel.cancelled() => {
            debug!(cmd = %command, "cancelled while draining command output");
            return Err(RunError::Cancelled);
        }
    };

    debug!(cmd = %command, ?status, "command exited");

    Ok(match status_error(status) {
        None => ExecutionOutcome::success(output),
        Some(err) => ExecutionOutcome::failure(output, err),
    })
}

fn status_error(status: ExitStatus) -> Option<RunError> {
    if status.success() {
        return None;
    }
    if let Some(code) = status.code() {
        return Some(RunError::Exit { code });
    }
    match terminating_signal(&status) {
        Some(signal) => Some(RunError::Signal { signal }),
        None => Some(RunError::Exit { code: -1 }),
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
