//! External command invocation.

use async_trait::async_trait;
use std::fmt;

use crate::Result;

/// A command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The command line as it would be typed in a shell.
    pub fn cli(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cli())
    }
}

/// Captured output of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for running external commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// A non-zero exit status is reported as [`crate::Error::Command`].
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_rendering() {
        let cmd = CommandSpec::new("kubectl").args(["apply", "-f", "/tmp/resources"]);
        assert_eq!(cmd.cli(), "kubectl apply -f /tmp/resources");
        assert_eq!(cmd.to_string(), cmd.cli());
    }

    #[test]
    fn test_builder() {
        let cmd = CommandSpec::new("echo").arg("hi").args(["there"]);
        assert_eq!(cmd.args, vec!["hi", "there"]);
        assert_eq!(CommandSpec::new("true").cli(), "true");
    }
}
