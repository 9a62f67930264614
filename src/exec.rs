//! Thin wrappers over OS command execution.
//!
//! Every external subsystem this crate talks to (access point control,
//! neighbor table, NetBIOS) is an OS command; failures are folded into
//! [`SentryError::CommandFailure`] with the failing step's diagnostic text.

use tokio::process::Command;

use crate::error::SentryError;

fn command_failure(program: &str, args: &[&str], detail: String) -> SentryError {
    SentryError::CommandFailure {
        command: format!("{} {}", program, args.join(" ")),
        detail,
    }
}

fn failure_detail(output: &std::process::Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.to_string()
    }
}

/// Runs a command and returns its stdout as text.
pub(crate) async fn capture_stdout(program: &str, args: &[&str]) -> Result<String, SentryError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| command_failure(program, args, e.to_string()))?;

    if !output.status.success() {
        return Err(command_failure(program, args, failure_detail(&output)));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs a command for its side effect, discarding stdout.
pub(crate) async fn run_checked(program: &str, args: &[&str]) -> Result<(), SentryError> {
    capture_stdout(program, args).await.map(|_| ())
}
