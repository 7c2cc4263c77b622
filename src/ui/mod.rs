//! ui
//!
//! Output utilities.
//!
//! # Modules
//!
//! - [`output`] - Verbosity handling and file-action display
//!
//! # Design
//!
//! Verbosity is an explicit value threaded through constructors and call
//! sites — never a process-wide flag.

pub mod output;
