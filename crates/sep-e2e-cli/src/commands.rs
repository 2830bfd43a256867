//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sep-e2e: run the SEP sandbox scenarios against the mock or a live sandbox
#[derive(Parser, Debug)]
#[command(name = "sep-e2e")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "SEP_E2E_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scenario suite
    Run(RunArgs),

    /// List scenario names and descriptions
    List(ListArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Only run scenarios whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,

    /// Drive a live sandbox through Chromium instead of the mock
    #[arg(long)]
    pub live: bool,

    /// Sandbox base URL (overrides config and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Wait timeout in milliseconds (overrides config and environment)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only list scenarios whose name contains this pattern
    #[arg(short, long)]
    pub filter: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// Output format
    #[arg(long, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Suite report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One line per scenario and a summary
    #[default]
    Text,
    /// The full report as JSON on stdout
    Json,
}

/// Configuration output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML, loadable with `--config`
    #[default]
    Yaml,
    /// JSON
    Json,
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
