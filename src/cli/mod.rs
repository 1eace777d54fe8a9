// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for working with pose datasets.
//!
//! This module contains the command-line interface logic: argument parsing,
//! terminal output and one runner per subcommand.

// Modules
/// CLI arguments.
pub mod args;

/// Terminal output macros.
pub mod logging;

/// `reshape` and `clean` commands.
pub mod transform;

/// `info` and `trajectory` commands.
pub mod inspect;
