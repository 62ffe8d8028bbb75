//! Shell command execution for `KEY=SHELL command` rules.
use std::process::{Command, Output};

use crate::error::ConfigError;

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, if the command was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

fn shell(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command]);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command]);
        cmd
    }
}

/// Run `command` through the system shell, bailing on non-zero exit.
///
/// # Errors
///
/// Returns [`ConfigError::Shell`] if the shell cannot be started and
/// [`ConfigError::ShellFailed`] if the command exits non-zero.
pub fn run_shell(command: &str) -> Result<ExecResult, ConfigError> {
    let output = shell(command)
        .output()
        .map_err(|source| ConfigError::Shell {
            command: command.to_string(),
            source,
        })?;
    let result = ExecResult::from(output);
    if !result.success {
        return Err(ConfigError::ShellFailed {
            command: command.to_string(),
            code: result.code.unwrap_or(-1),
            stderr: result.stderr.trim().to_string(),
        });
    }
    Ok(result)
}

/// Run `command` and return its trimmed standard output, the value a
/// `KEY=SHELL command` rule substitutes.
///
/// # Errors
///
/// See [`run_shell`].
pub fn shell_value(command: &str) -> Result<String, ConfigError> {
    tracing::debug!("running shell command: {command}");
    run_shell(command).map(|result| result.stdout.trim().to_string())
}
