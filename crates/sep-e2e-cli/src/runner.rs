//! Command handlers

use crate::commands::{ConfigArgs, ConfigFormat, ListArgs, ReportFormat, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use sep_e2e::{sandbox_suite, E2eConfig, MockDriver, ScenarioRunner, ScenarioSuite, Session};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Configuration file and environment, then the run flags
pub fn effective_config(path: Option<&Path>, args: &RunArgs) -> CliResult<E2eConfig> {
    let mut config = E2eConfig::load(path)?;
    if let Some(ref url) = args.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(ms) = args.timeout {
        config.timeout_ms = ms;
    }
    if args.headed {
        config.browser.headless = false;
    }
    config.validate()?;
    Ok(config)
}

fn suite(filter: Option<&str>) -> ScenarioSuite {
    let suite = sandbox_suite();
    match filter {
        Some(pattern) => suite.filter(pattern),
        None => suite,
    }
}

#[cfg(feature = "browser")]
async fn live_driver(config: &E2eConfig) -> CliResult<Arc<dyn sep_e2e::WebDriver>> {
    let driver = sep_e2e::ChromiumDriver::launch(config.browser.clone()).await?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn live_driver(_config: &E2eConfig) -> CliResult<Arc<dyn sep_e2e::WebDriver>> {
    Err(CliError::invalid_argument(
        "--live needs a build with the `browser` feature",
    ))
}

/// `sep-e2e run`
pub async fn run(cli: CliConfig, config_path: Option<&Path>, args: &RunArgs) -> CliResult<()> {
    let config = effective_config(config_path, args)?;
    let suite = suite(args.filter.as_deref());
    if suite.is_empty() {
        return Err(CliError::invalid_argument(format!(
            "no scenario matches '{}'",
            args.filter.as_deref().unwrap_or_default()
        )));
    }

    let driver: Arc<dyn sep_e2e::WebDriver> = if args.live {
        live_driver(&config).await?
    } else {
        Arc::new(MockDriver::with_sandbox_apps())
    };
    info!(live = args.live, base_url = %config.base_url, scenarios = suite.len(), "running suite");

    let session = Session::from_arc(driver).with_wait_options(config.wait_options());
    let report = ScenarioRunner::new(session.clone(), &config.base_url)
        .with_fail_fast(args.fail_fast)
        .run(&suite)
        .await;
    if args.live {
        session.close().await?;
    }

    match args.format {
        ReportFormat::Json => println!("{}", report.to_json()?),
        ReportFormat::Text => {
            let reporter = Reporter::new(cli.color.should_color(), cli.verbosity.is_quiet());
            reporter.header(&format!("sep-e2e: {} ({})", report.suite, report.run_id));
            for outcome in &report.outcomes {
                reporter.outcome(outcome);
            }
            reporter.summary(&report);
        }
    }

    if report.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: report.failed_count() + report.skipped_count(),
            total: report.outcomes.len(),
        })
    }
}

/// `sep-e2e list`
pub fn list(cli: CliConfig, args: &ListArgs) {
    let reporter = Reporter::new(cli.color.should_color(), false);
    for scenario in suite(args.filter.as_deref()).scenarios() {
        if cli.verbosity.is_quiet() {
            reporter.line(scenario.name());
        } else {
            reporter.line(&format!("{:<24} {}", scenario.name(), scenario.description()));
        }
    }
}

/// `sep-e2e config`
pub fn show_config(config_path: Option<&Path>, args: &ConfigArgs) -> CliResult<String> {
    let config = E2eConfig::load(config_path)?;
    Ok(match args.format {
        ConfigFormat::Yaml => config.to_yaml()?,
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
    })
}
