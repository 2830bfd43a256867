//! sep-e2e: run the SEP sandbox scenarios
//!
//! ```bash
//! sep-e2e run                          # whole suite against the mock sandbox
//! sep-e2e run --filter model-import    # matching scenarios only
//! sep-e2e run --live --base-url http://localhost:5000
//! sep-e2e list
//! sep-e2e config --format json
//! ```

use clap::Parser;
use sep_e2e::{init_tracing, LogFormat};
use sep_e2e_cli::{Cli, CliConfig, CliError, CliResult, Commands, Verbosity};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ScenariosFailed { failed, total }) => {
            eprintln!("{failed} of {total} scenarios did not pass");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let config = CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(cli.color.into());
    let _ = init_tracing(verbosity.log_level(), LogFormat::Text);

    match cli.command {
        Commands::Run(ref args) => sep_e2e_cli::run(config, cli.config.as_deref(), args).await,
        Commands::List(ref args) => {
            sep_e2e_cli::list(config, args);
            Ok(())
        }
        Commands::Config(ref args) => {
            println!("{}", sep_e2e_cli::show_config(cli.config.as_deref(), args)?);
            Ok(())
        }
    }
}
