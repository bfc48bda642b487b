//! Shell execution of a simulation command.
//!
//! The command line runs through the platform shell and blocks until it
//! exits. A nonzero exit is reported through [`CommandOutcome`] rather than
//! as an error; only a failure to start the shell is an `Err`.

use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};
use tracing::{error, info};

/// Exit status and captured text of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Standard output followed by standard error.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }

    fn from_output(output: Output) -> Self {
        Self {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}

/// Run `command_line` through the shell, capturing its output, and log the
/// result. A nonzero exit is logged as an error and returned, not raised.
pub fn run_command(command_line: &str) -> Result<CommandOutcome> {
    info!(command = command_line, "Executing simulation command");

    let output = shell_command(command_line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to spawn shell for command: {command_line}"))?;

    let outcome = CommandOutcome::from_output(output);

    if outcome.success() {
        info!("Output: {}", outcome.stdout);
    } else {
        let code = outcome
            .exit_code
            .map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string());
        error!(exit_code = ?outcome.exit_code, "Command failed with return code {code}. Error output:");
        error!("{}", outcome.combined_output());
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
