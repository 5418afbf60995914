//! Terminal status output
//!
//! Every user-facing status line goes through [`status`], tagged with a
//! semantic [`Level`] that maps to an ANSI color. Escape sequences are
//! rendered only when stdout is a terminal, so piped or captured output
//! stays clean.

use std::io::IsTerminal;

/// Semantic level of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Progress lines (compiling, running, filtering).
    Info,
    /// Output matches the reference.
    Success,
    /// Ran cleanly but there is nothing to compare against.
    Warning,
    /// Compilation error, runtime error, or output mismatch.
    Error,
}

impl Level {
    fn ansi_code(self) -> &'static str {
        match self {
            Level::Info => "37",
            Level::Success => "32",
            Level::Warning => "33",
            Level::Error => "31",
        }
    }
}

/// Format `text` at the given level, coloring only when `color` is set.
pub fn paint_with(level: Level, text: &str, color: bool) -> String {
    if color {
        format!("\x1b[{}m{}\x1b[0m", level.ansi_code(), text)
    } else {
        text.to_string()
    }
}

/// Format `text` for stdout, coloring when stdout is a terminal.
pub fn paint(level: Level, text: &str) -> String {
    paint_with(level, text, std::io::stdout().is_terminal())
}

/// Print a status line to stdout.
pub fn status(level: Level, text: &str) {
    println!("{}", paint(level, text));
}
