//! Toolchain selection
//!
//! Maps a source file's extension to the pair of commands for its language:
//! a compile step and a run template. Adding a language is a data-only
//! change in [`Toolchain::for_source`].

use std::path::Path;

use crate::exec::CommandSpec;

/// Languages with a dedicated toolchain.
///
/// Unrecognized extensions silently map to [`Language::Cpp`]; that latitude
/// keeps the default C/C++ workflow free of extension bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Cpp,
    Java,
    Go,
    Ruby,
}

impl Language {
    /// Select a language from the source file's extension.
    pub fn from_source(source: &Path) -> Language {
        match source.extension().and_then(|e| e.to_str()) {
            Some("java") => Language::Java,
            Some("go") => Language::Go,
            Some("rb") => Language::Ruby,
            _ => Language::Cpp,
        }
    }
}

/// The pair of commands associated with a source file's language.
#[derive(Debug, Clone)]
pub struct Toolchain {
    /// Compile step; `None` for interpreted languages (no-op success).
    compile: Option<CommandSpec>,
    /// Program run once per input file; the runner wires up stdin/stdout.
    run: CommandSpec,
}

impl Toolchain {
    /// Build the toolchain for `source` based on its extension.
    pub fn for_source(source: &Path) -> Toolchain {
        let src = source.display().to_string();
        let base = basename(source);

        match Language::from_source(source) {
            Language::Java => Toolchain {
                compile: Some(CommandSpec::new("javac").arg(&src)),
                run: CommandSpec::new("java")
                    .arg("-enableassertions")
                    .arg("-Xmx256m")
                    .arg(&base),
            },
            Language::Go => Toolchain {
                compile: Some(
                    CommandSpec::new("go")
                        .arg("build")
                        .arg("-o")
                        .arg(&base)
                        .arg(&src),
                ),
                run: CommandSpec::new(format!("./{base}")),
            },
            Language::Ruby => Toolchain {
                compile: None,
                run: CommandSpec::new("ruby").arg(&src),
            },
            Language::Cpp => Toolchain {
                compile: Some(
                    CommandSpec::new("g++")
                        .arg(&src)
                        .arg("-o")
                        .arg(&base)
                        .arg("-DLOCAL")
                        .arg("-std=c++17"),
                ),
                run: CommandSpec::new(format!("./{base}")),
            },
        }
    }

    /// Assemble a toolchain from explicit command specs.
    pub fn from_parts(compile: Option<CommandSpec>, run: CommandSpec) -> Toolchain {
        Toolchain { compile, run }
    }

    /// Compile command, or `None` when the language is interpreted.
    pub fn compile_spec(&self) -> Option<&CommandSpec> {
        self.compile.as_ref()
    }

    /// Command the runner executes once per input file.
    pub fn run_spec(&self) -> &CommandSpec {
        &self.run
    }
}

/// File name without its final extension; the compiled artifact's name.
fn basename(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "a.out".to_string())
}
