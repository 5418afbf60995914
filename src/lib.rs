#![forbid(unsafe_code)]
//! cptest — compile a solution, then batch-test it against sample files
//!
//! Competitive-programming workflow: one solution file sits next to many
//! sample input files (`*in*`), each optionally paired with an expected
//! output file (same name with the last "in" replaced by "out"). cptest
//! picks a toolchain from the source file's extension, compiles once, runs
//! the program against every input, and reports a color-coded verdict per
//! input by diffing against the expected output where one exists.
//!
//! ## Panic Policy
//!
//! Production code uses `Result` with `?` / `ok_or` / `map_err`; only the
//! CLI entry point in [`cli::run`] calls `process::exit`. `.unwrap()` and
//! `.expect()` are acceptable in tests.

pub mod cli;
pub mod exec;
pub mod report;
pub mod runner;
pub mod toolchain;

pub use exec::{CommandSpec, ExecError, Outcome};
pub use runner::{RunConfig, RunnerError, Verdict};
pub use toolchain::{Language, Toolchain};
