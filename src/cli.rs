//! Command-line interface
//!
//! `cptest <source-file> [filter1 [filter2 ...]]`
//!
//! The CLI uses clap for argument parsing with derive macros. Command logic
//! returns `CliResult<T>` instead of calling `process::exit`; only the
//! top-level [`run`] function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use regex::Regex;

use crate::report::{self, Level};
use crate::runner::{self, RunConfig};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Compile a solution and run it against local sample input/output files
#[derive(Parser, Debug)]
#[command(name = "cptest")]
#[command(version = VERSION)]
#[command(
    about = "Compile a solution and run it against local sample input/output files",
    long_about = None
)]
pub struct Cli {
    /// Source file to compile and test
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Regex filters; an input file is run if its name matches any of them
    #[arg(value_name = "FILTER")]
    pub filters: Vec<String>,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. The command
/// implementation returns `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the batch run and return its exit code.
///
/// Mismatches and runtime errors are reported per input and do not affect
/// the exit code; only a bad source argument or a failed compile does.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    if !cli.source.is_file() {
        return Err(CliError::failure(format!(
            "ERROR: {} doesn't exist or is a directory. Did you mistype something?",
            cli.source.display()
        )));
    }

    let filters = compile_filters(&cli.filters)?;
    let config = RunConfig::new(cli.source, filters);

    match runner::run(&config) {
        Ok(_verdicts) => Ok(ExitCode::SUCCESS),
        Err(e) => Err(CliError::failure(report::paint(
            Level::Error,
            &format!("*** {e}"),
        ))),
    }
}

/// Compile the raw filter arguments, surfacing a clean message for an
/// invalid pattern.
fn compile_filters(raw: &[String]) -> CliResult<Vec<Regex>> {
    raw.iter()
        .map(|pattern| {
            Regex::new(pattern)
                .map_err(|e| CliError::failure(format!("Invalid filter '{pattern}': {e}")))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_source_only() {
        let cli = Cli::try_parse_from(["cptest", "sum.cpp"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("sum.cpp"));
        assert!(cli.filters.is_empty());
    }

    #[test]
    fn test_cli_parse_with_filters() {
        let cli = Cli::try_parse_from(["cptest", "sum.cpp", "small", "large"]).unwrap();
        assert_eq!(cli.filters, ["small", "large"]);
    }

    #[test]
    fn test_cli_requires_source() {
        assert!(Cli::try_parse_from(["cptest"]).is_err());
    }

    #[test]
    fn test_compile_filters_accepts_valid_patterns() {
        let filters = compile_filters(&["small".to_string(), r"\d+".to_string()]).unwrap();
        assert_eq!(filters.len(), 2);
        assert!(filters[1].is_match("case12"));
    }

    #[test]
    fn test_compile_filters_rejects_invalid_pattern() {
        let err = compile_filters(&["(unclosed".to_string()]).unwrap_err();
        assert!(err.message.contains("Invalid filter"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_execute_rejects_missing_source() {
        let cli = Cli::try_parse_from(["cptest", "no-such-file.cpp"]).unwrap();
        let err = execute(cli).unwrap_err();
        assert!(err.message.contains("doesn't exist"));
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }
}
