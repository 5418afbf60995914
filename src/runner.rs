//! Batch runner
//!
//! Compiles the solution once, discovers candidate input files in the
//! working directory, executes the program against each, and reports a
//! color-coded verdict per input. Strictly sequential; no verdict is
//! aggregated into a summary.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use regex::Regex;
use thiserror::Error;

use crate::exec::{CommandSpec, ExecError};
use crate::report::{self, Level};
use crate::toolchain::Toolchain;

/// Extensions of source files and build artifacts that are never inputs.
const EXCLUDED_EXTENSIONS: [&str; 4] = ["java", "class", "cpp", "go"];

/// Fatal runner failure. Per-input failures (runtime error, mismatch) are
/// verdicts, not errors; they never abort the batch.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Compilation Error")]
    CompilationFailed,
    #[error("cannot read directory '{dir}': {source}")]
    ReadDir { dir: String, source: io::Error },
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Per-input outcome, annotated with elapsed wall-clock time.
#[derive(Debug)]
pub enum Verdict {
    /// The program exited non-zero.
    RuntimeError { elapsed: Duration },
    /// Ran cleanly; no expected-output file exists for this input.
    NoReference { elapsed: Duration, captured: PathBuf },
    /// Captured output is byte-identical to the expected-output file.
    Match { elapsed: Duration, expected: PathBuf },
    /// Captured output differs from the expected-output file.
    Mismatch { elapsed: Duration, expected: PathBuf },
}

/// Configuration for one batch run, fixed for the run's lifetime.
#[derive(Debug)]
pub struct RunConfig {
    /// The solution source file.
    pub source: PathBuf,
    /// Commands selected for the source file's language.
    pub toolchain: Toolchain,
    /// Filename filters; an empty list matches every input file.
    pub filters: Vec<Regex>,
    /// Directory holding input and expected-output files.
    pub work_dir: PathBuf,
    /// Directory receiving captured outputs, one `<input>.out` per input.
    pub temp_dir: PathBuf,
}

impl RunConfig {
    /// Configuration for a run over the current working directory, with the
    /// toolchain selected from the source file's extension.
    pub fn new(source: PathBuf, filters: Vec<Regex>) -> RunConfig {
        let toolchain = Toolchain::for_source(&source);
        RunConfig {
            source,
            toolchain,
            filters,
            work_dir: PathBuf::from("."),
            temp_dir: env::temp_dir(),
        }
    }

    /// Override the selected toolchain (tests exercise the runner with
    /// shell-based toolchains so no real compiler is required).
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> RunConfig {
        self.toolchain = toolchain;
        self
    }

    /// Override the working and temp directories.
    pub fn with_dirs(mut self, work_dir: PathBuf, temp_dir: PathBuf) -> RunConfig {
        self.work_dir = work_dir;
        self.temp_dir = temp_dir;
        self
    }
}

/// Compile the solution, then run it against every discovered input.
///
/// Returns the per-input verdicts in execution order. Verdicts are reported
/// as they happen; a mismatch or runtime error is not an `Err`.
pub fn run(config: &RunConfig) -> Result<Vec<(String, Verdict)>, RunnerError> {
    compile(config)?;
    run_batch(config)
}

/// Run the compile step, aborting the whole run on a non-zero exit.
///
/// The child inherits the parent's standard streams so compiler diagnostics
/// land on the user's terminal unmodified.
pub fn compile(config: &RunConfig) -> Result<(), RunnerError> {
    let Some(spec) = config.toolchain.compile_spec() else {
        // Interpreted language, nothing to build.
        return Ok(());
    };

    report::status(
        Level::Info,
        &format!(
            "*** Compiling {} with '{}'...",
            config.source.display(),
            spec.display()
        ),
    );
    let outcome = spec.run_inherited()?;
    if !outcome.success {
        return Err(RunnerError::CompilationFailed);
    }
    report::status(Level::Success, "*** Compiled");
    println!();
    Ok(())
}

/// Execute the program against every surviving input file, in sorted name
/// order, reporting one verdict per input.
pub fn run_batch(config: &RunConfig) -> Result<Vec<(String, Verdict)>, RunnerError> {
    if !config.filters.is_empty() {
        let patterns: Vec<&str> = config.filters.iter().map(|f| f.as_str()).collect();
        report::status(
            Level::Info,
            &format!("*** Filtering files with these regexps: {}", patterns.join(",")),
        );
    }

    let inputs = discover_inputs(&config.work_dir, &config.filters)?;
    let mut verdicts = Vec::with_capacity(inputs.len());

    for input in inputs {
        report::status(Level::Info, &format!("*** Running with '{input}'..."));
        let verdict = run_one(config, &input)?;
        verdicts.push((input, verdict));
    }

    Ok(verdicts)
}

/// Run one input file and classify the result.
fn run_one(config: &RunConfig, input_name: &str) -> Result<Verdict, RunnerError> {
    let input_path = config.work_dir.join(input_name);
    let captured = config.temp_dir.join(format!("{input_name}.out"));

    let start = Instant::now();
    let outcome = config.toolchain.run_spec().run_redirected(&input_path, &captured)?;
    let elapsed = start.elapsed();

    if !outcome.success {
        report::status(Level::Error, &format!("*** Runtime error with '{input_name}'"));
        return Ok(Verdict::RuntimeError { elapsed });
    }

    let expected = expected_output_name(input_name)
        .map(|name| config.work_dir.join(name))
        .filter(|path| path.is_file());

    let Some(expected) = expected else {
        report::status(
            Level::Warning,
            &format!("*** No errors ({} sec)", format_elapsed(elapsed)),
        );
        dump_captured(&captured);
        return Ok(Verdict::NoReference { elapsed, captured });
    };

    let diff = CommandSpec::new("diff")
        .arg(captured.display().to_string())
        .arg(expected.display().to_string())
        .run_captured()?;
    if !diff.stdout.is_empty() {
        print!("{}", diff.stdout);
    }

    if diff.success {
        report::status(
            Level::Success,
            &format!(
                "*** Output matches {} ({} sec)",
                expected.display(),
                format_elapsed(elapsed)
            ),
        );
        Ok(Verdict::Match { elapsed, expected })
    } else {
        report::status(
            Level::Error,
            &format!(
                "*** There are differences with {} ({} sec)",
                expected.display(),
                format_elapsed(elapsed)
            ),
        );
        Ok(Verdict::Mismatch { elapsed, expected })
    }
}

/// Discover candidate input files under `dir`, sorted by name.
///
/// A candidate is a regular file whose name contains "in", does not contain
/// "out", has no source/artifact extension, and is not identified by a
/// `file(1)` probe as an executable binary. With filters present, the name
/// must additionally match at least one of them.
pub fn discover_inputs(dir: &Path, filters: &[Regex]) -> Result<Vec<String>, RunnerError> {
    let entries = fs::read_dir(dir).map_err(|e| RunnerError::ReadDir {
        dir: dir.display().to_string(),
        source: e,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if !name.contains("in") || name.contains("out") {
            continue;
        }
        if has_excluded_extension(name) {
            tracing::debug!(file = name, "skipping source/artifact file");
            continue;
        }
        if probed_as_executable(&path) {
            tracing::debug!(file = name, "skipping executable binary");
            continue;
        }
        if !filters.is_empty() && !filters.iter().any(|f| f.is_match(name)) {
            continue;
        }

        names.push(name.to_string());
    }

    names.sort();
    Ok(names)
}

/// Derive the expected-output filename by replacing the last occurrence of
/// "in" with "out". `None` when the name contains no "in" at all (cannot
/// happen for discovered inputs).
pub fn expected_output_name(input_name: &str) -> Option<String> {
    let pos = input_name.rfind("in")?;
    let mut name = String::with_capacity(input_name.len() + 1);
    name.push_str(&input_name[..pos]);
    name.push_str("out");
    name.push_str(&input_name[pos + 2..]);
    Some(name)
}

fn has_excluded_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXCLUDED_EXTENSIONS.contains(&ext))
}

/// Probe a candidate with `file(1)` to catch compiled binaries whose name
/// happens to contain "in". An unavailable probe counts as not executable
/// so the tool stays usable where `file` is absent.
fn probed_as_executable(path: &Path) -> bool {
    match CommandSpec::new("file")
        .arg(path.display().to_string())
        .run_captured()
    {
        Ok(outcome) => probe_reports_executable(&outcome.stdout),
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "file probe unavailable");
            false
        }
    }
}

fn probe_reports_executable(probe_output: &str) -> bool {
    probe_output.contains("executable")
}

/// Print the captured output for manual inspection (no reference to diff
/// against).
fn dump_captured(captured: &Path) {
    match fs::read_to_string(captured) {
        Ok(contents) => print!("{contents}"),
        Err(e) => tracing::warn!(file = %captured.display(), error = %e, "cannot read captured output"),
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expected_output_name_replaces_last_in() {
        assert_eq!(expected_output_name("sum.1.in").as_deref(), Some("sum.1.out"));
        assert_eq!(expected_output_name("basicinput.in").as_deref(), Some("basicinput.out"));
        assert_eq!(expected_output_name("inwin.in").as_deref(), Some("inwin.out"));
        assert_eq!(expected_output_name("input").as_deref(), Some("output"));
    }

    #[test]
    fn test_expected_output_name_without_in() {
        assert_eq!(expected_output_name("sample"), None);
    }

    #[test]
    fn test_excluded_extensions() {
        assert!(has_excluded_extension("solution.in.cpp"));
        assert!(has_excluded_extension("Main.class"));
        assert!(has_excluded_extension("main.go"));
        assert!(has_excluded_extension("Main.java"));
        assert!(!has_excluded_extension("sum.1.in"));
        assert!(!has_excluded_extension("input.txt"));
    }

    #[test]
    fn test_probe_output_classification() {
        assert!(probe_reports_executable(
            "problem2_offline: ELF 64-bit LSB executable, x86-64"
        ));
        assert!(probe_reports_executable(
            "problem2_offline: Mach-O 64-bit executable x86_64"
        ));
        assert!(!probe_reports_executable("sum.1.in: ASCII text"));
    }

    #[test]
    fn test_discovery_picks_inputs_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sum.2.in"), "3 4\n").unwrap();
        fs::write(dir.path().join("sum.1.in"), "1 2\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "no match\n").unwrap();

        let found = discover_inputs(dir.path(), &[]).unwrap();
        assert_eq!(found, ["sum.1.in", "sum.2.in"]);
    }

    #[test]
    fn test_discovery_excludes_out_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sum.1.in"), "1 2\n").unwrap();
        fs::write(dir.path().join("sum.1.out"), "3\n").unwrap();

        let found = discover_inputs(dir.path(), &[]).unwrap();
        assert_eq!(found, ["sum.1.in"]);
    }

    #[test]
    fn test_discovery_excludes_source_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sum.1.in"), "1 2\n").unwrap();
        fs::write(dir.path().join("main.cpp"), "int main() {}\n").unwrap();
        fs::write(dir.path().join("main.go"), "package main\n").unwrap();
        fs::write(dir.path().join("Main.java"), "class Main {}\n").unwrap();
        fs::write(dir.path().join("Main.class"), b"\xca\xfe\xba\xbe").unwrap();

        let found = discover_inputs(dir.path(), &[]).unwrap();
        assert_eq!(found, ["sum.1.in"]);
    }

    #[test]
    fn test_discovery_excludes_directories() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sum.1.in"), "1 2\n").unwrap();
        fs::create_dir(dir.path().join("input_cases")).unwrap();

        let found = discover_inputs(dir.path(), &[]).unwrap();
        assert_eq!(found, ["sum.1.in"]);
    }

    #[test]
    fn test_discovery_filters_are_or_ed() {
        let dir = TempDir::new().unwrap();
        for name in ["small.1.in", "small.2.in", "large.1.in", "edge.1.in"] {
            fs::write(dir.path().join(name), "x\n").unwrap();
        }

        let filters = vec![Regex::new("small").unwrap(), Regex::new("large").unwrap()];
        let found = discover_inputs(dir.path(), &filters).unwrap();
        assert_eq!(found, ["large.1.in", "small.1.in", "small.2.in"]);
    }

    #[test]
    fn test_discovery_empty_filter_list_matches_all() {
        let dir = TempDir::new().unwrap();
        for name in ["a.1.in", "b.1.in"] {
            fs::write(dir.path().join(name), "x\n").unwrap();
        }

        let found = discover_inputs(dir.path(), &[]).unwrap();
        assert_eq!(found, ["a.1.in", "b.1.in"]);
    }

    #[test]
    fn test_missing_directory_is_read_dir_error() {
        let dir = TempDir::new().unwrap();
        let err = discover_inputs(&dir.path().join("gone"), &[]).unwrap_err();
        assert!(matches!(err, RunnerError::ReadDir { .. }));
    }
}
