//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output respects an explicit [`Verbosity`] value threaded through from
//! the caller; there is no process-wide quiet flag. File actions are a
//! closed set ([`ActionKind`]) rendered through an explicit match.

use std::fmt::Display;
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const BOLD_GREEN: &str = "\x1b[1m\x1b[32m";
const BOLD_YELLOW: &str = "\x1b[1m\x1b[33m";
const BOLD_BLUE: &str = "\x1b[1m\x1b[34m";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// What happened to an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// The file did not exist and was written.
    Create,
    /// The file existed with different content and was rewritten.
    Update,
    /// The file was moved to a new path.
    Move,
    /// The file existed with identical content and was left alone.
    Identical,
}

impl ActionKind {
    fn label(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Move => "move",
            ActionKind::Identical => "identical",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            ActionKind::Create => BOLD_GREEN,
            ActionKind::Update => BOLD_YELLOW,
            ActionKind::Move => BOLD_BLUE,
            ActionKind::Identical => BOLD,
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Format a file-action line: a colourized, right-aligned action label
/// followed by the path.
pub fn format_action(kind: ActionKind, path: &Path) -> String {
    format!(
        "{}{:>12}{}  {}",
        kind.color(),
        kind.label(),
        RESET,
        path.display()
    )
}

/// Print a file-action line (respects quiet mode).
pub fn log_action(kind: ActionKind, path: &Path, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", format_action(kind, path));
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}
