//! Command runner that spawns local processes.

use async_trait::async_trait;
use gitjob_core::runner::{CommandOutput, CommandRunner, CommandSpec};
use gitjob_core::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

/// Runs commands as child processes and waits for them to exit.
#[derive(Debug, Clone, Default)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        info!(command = %command, "running command");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = cmd.output().await.map_err(|e| Error::Command {
            command: command.cli(),
            message: e.to_string(),
        })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            warn!(command = %command, exit_code = ?result.exit_code, "command failed");
            return Err(Error::Command {
                command: command.cli(),
                message: format!("{}: {}", output.status, result.stderr.trim()),
            });
        }

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_command() {
        let runner = ProcessCommandRunner::new();
        let output = runner
            .run(&CommandSpec::new("sh").args(["-c", "echo hello"]))
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_failing_command_reports_stderr() {
        let runner = ProcessCommandRunner::new();
        let result = runner
            .run(&CommandSpec::new("sh").args(["-c", "echo boom >&2; exit 3"]))
            .await;
        match result {
            Err(Error::Command { command, message }) => {
                assert!(command.starts_with("sh -c"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected command error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessCommandRunner::new();
        let result = runner
            .run(&CommandSpec::new("definitely-not-a-real-binary-gitjob"))
            .await;
        assert!(matches!(result, Err(Error::Command { .. })));
    }
}
