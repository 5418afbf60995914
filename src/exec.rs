//! External process invocation
//!
//! Every external command (compiler, solution binary, `diff`, `file`) goes
//! through [`CommandSpec`] and comes back as a structured [`Outcome`] with
//! the exit status and any captured streams. Nothing inspects an implicit
//! "last command" status.

use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Error launching or redirecting an external command.
///
/// These are infrastructure failures (binary not found, unreadable input
/// file), distinct from a command that launched fine and exited non-zero.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to launch '{command}': {source}")]
    Spawn { command: String, source: io::Error },
    #[error("cannot redirect '{path}': {source}")]
    Redirect { path: String, source: io::Error },
}

/// Outcome of a finished child process.
#[derive(Debug)]
pub struct Outcome {
    /// Whether the child exited with status zero.
    pub success: bool,
    /// Exit code, if the child exited normally (not via signal).
    pub exit_code: Option<i32>,
    /// Captured stdout; empty unless run with [`CommandSpec::run_captured`].
    pub stdout: String,
    /// Captured stderr; empty unless run with [`CommandSpec::run_captured`].
    pub stderr: String,
}

impl Outcome {
    fn from_status(status: std::process::ExitStatus) -> Self {
        Self {
            success: status.success(),
            exit_code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// A program plus its arguments, ready to be spawned.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
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

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Shell-style rendering for status messages.
    pub fn display(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    fn spawn_error(&self, source: io::Error) -> ExecError {
        ExecError::Spawn {
            command: self.display(),
            source,
        }
    }

    /// Run synchronously with the parent's standard streams (compiler
    /// invocations, so build errors land on the user's terminal).
    pub fn run_inherited(&self) -> Result<Outcome, ExecError> {
        tracing::debug!(command = %self.display(), "spawning (inherited stdio)");
        let status = self
            .to_command()
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(Outcome::from_status(status))
    }

    /// Run with stdin read from `input` and stdout captured to `output`.
    /// Stderr stays inherited so runtime errors are visible.
    pub fn run_redirected(&self, input: &Path, output: &Path) -> Result<Outcome, ExecError> {
        let stdin = File::open(input).map_err(|e| ExecError::Redirect {
            path: input.display().to_string(),
            source: e,
        })?;
        let stdout = File::create(output).map_err(|e| ExecError::Redirect {
            path: output.display().to_string(),
            source: e,
        })?;

        tracing::debug!(
            command = %self.display(),
            input = %input.display(),
            output = %output.display(),
            "spawning (redirected)"
        );
        let status = self
            .to_command()
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::from(stdout))
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(Outcome::from_status(status))
    }

    /// Run with stdout and stderr captured (`diff`, `file` probes).
    pub fn run_captured(&self) -> Result<Outcome, ExecError> {
        tracing::debug!(command = %self.display(), "spawning (captured)");
        let output = self
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        Ok(Outcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_display_renders_program_and_args() {
        let spec = CommandSpec::new("g++").arg("sum.cpp").arg("-o").arg("sum");
        assert_eq!(spec.display(), "g++ sum.cpp -o sum");
    }

    #[test]
    fn test_run_captured_reports_exit_status() {
        let ok = CommandSpec::new("true").run_captured().unwrap();
        assert!(ok.success);
        assert_eq!(ok.exit_code, Some(0));

        let bad = CommandSpec::new("false").run_captured().unwrap();
        assert!(!bad.success);
    }

    #[test]
    fn test_run_captured_collects_stdout() {
        let outcome = CommandSpec::new("echo").arg("hello").run_captured().unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.stdout, "hello\n");
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let err = CommandSpec::new("cptest-no-such-binary")
            .run_captured()
            .unwrap_err();
        assert!(matches!(err, ExecError::Spawn { .. }));
    }

    #[test]
    fn test_run_redirected_pipes_input_to_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("numbers.in");
        let output = dir.path().join("numbers.captured");
        fs::write(&input, "1 2 3\n").unwrap();

        let outcome = CommandSpec::new("cat").run_redirected(&input, &output).unwrap();
        assert!(outcome.success);
        assert_eq!(fs::read_to_string(&output).unwrap(), "1 2 3\n");
    }

    #[test]
    fn test_run_redirected_missing_input_is_redirect_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = CommandSpec::new("cat")
            .run_redirected(&dir.path().join("absent.in"), &dir.path().join("x"))
            .unwrap_err();
        assert!(matches!(err, ExecError::Redirect { .. }));
    }
}
