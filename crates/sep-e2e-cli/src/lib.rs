//! sep-e2e CLI library
//!
//! Argument parsing, configuration layering and report output for the
//! `sep-e2e` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ConfigFormat, ListArgs, ReportFormat, RunArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{format_outcome, Reporter};
pub use runner::{effective_config, list, run, show_config};
