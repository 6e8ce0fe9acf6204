//! Terminal front end: a dialoguer-driven interactive walk through the
//! wizard, and a line-oriented script mode for automation and tests.

pub mod commands;
pub mod core;
pub mod help;
mod interactive;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;

pub use self::core::{CliError, CommandError};
pub use shell::run_cli;
pub use shell_context::{CliMode, CliOptions, ShellContext};
