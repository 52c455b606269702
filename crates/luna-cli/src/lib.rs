//! Luna CLI library.
//!
//! Terminal front end for the fortune teller: configuration profiles, the
//! one-shot `ask` command, the interactive prompt and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
