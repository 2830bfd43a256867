//! Scenario harness: suites, a sequential runner and serializable reports.
//!
//! Every scenario gets a fresh [`SandboxPage`] on the shared session, so its
//! first `open` always navigates. A failing (or panicking) scenario is
//! recorded and the runner moves on, unless fail-fast is enabled.

use crate::driver::Session;
use crate::result::E2eResult;
use crate::sandbox::SandboxPage;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

type ScenarioFn = Arc<dyn Fn(SandboxPage) -> BoxFuture<'static, E2eResult<()>> + Send + Sync>;

/// A named scenario run against a sandbox
#[derive(Clone)]
pub struct Scenario {
    name: String,
    description: String,
    run: ScenarioFn,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario from an async body
    pub fn new<F, Fut>(name: impl Into<String>, description: impl Into<String>, body: F) -> Self
    where
        F: Fn(SandboxPage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = E2eResult<()>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            run: Arc::new(move |page| body(page).boxed()),
        }
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// An ordered collection of scenarios
#[derive(Debug, Clone)]
pub struct ScenarioSuite {
    /// Suite name
    pub name: String,
    scenarios: Vec<Scenario>,
}

impl ScenarioSuite {
    /// Create an empty suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Append a scenario
    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Append a scenario (builder form)
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.add(scenario);
        self
    }

    /// Keep only the scenarios whose name contains `pattern`
    #[must_use]
    pub fn filter(mut self, pattern: &str) -> Self {
        self.scenarios.retain(|s| s.name.contains(pattern));
        self
    }

    /// Scenarios in run order
    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Number of scenarios
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the suite has no scenarios
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Status of one scenario in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    /// Completed without error
    Passed,
    /// Returned an error or panicked
    Failed,
    /// Not run because an earlier scenario failed in fail-fast mode
    Skipped,
}

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Result
    pub status: ScenarioStatus,
    /// Error message of a failed scenario
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    fn new(name: &str, status: ScenarioStatus, error: Option<String>, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status,
            error,
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Report of a suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Unique id of the run
    pub run_id: Uuid,
    /// Suite name
    pub suite: String,
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
    /// One entry per scenario, in run order
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    fn count(&self, status: ScenarioStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Whether no scenario failed or was skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.status == ScenarioStatus::Passed)
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// Failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScenarioStatus::Failed)
            .collect()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> E2eResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs suites sequentially on one session
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    session: Session,
    base_url: String,
    fail_fast: bool,
}

impl ScenarioRunner {
    /// Runner for the sandbox served at `base_url`
    #[must_use]
    pub fn new(session: Session, base_url: impl Into<String>) -> Self {
        Self {
            session,
            base_url: base_url.into(),
            fail_fast: false,
        }
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run every scenario of `suite` in order
    pub async fn run(&self, suite: &ScenarioSuite) -> SuiteReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        info!(%run_id, suite = %suite.name, scenarios = suite.len(), "suite started");

        let mut outcomes = Vec::with_capacity(suite.len());
        let mut stopped = false;
        for scenario in &suite.scenarios {
            if stopped {
                outcomes.push(ScenarioOutcome::new(
                    &scenario.name,
                    ScenarioStatus::Skipped,
                    None,
                    Duration::ZERO,
                ));
                continue;
            }
            let outcome = self.run_one(scenario).await;
            stopped = self.fail_fast && outcome.status == ScenarioStatus::Failed;
            outcomes.push(outcome);
        }

        let report = SuiteReport {
            run_id,
            suite: suite.name.clone(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            outcomes,
        };
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "suite finished"
        );
        report
    }

    async fn run_one(&self, scenario: &Scenario) -> ScenarioOutcome {
        info!(scenario = %scenario.name, "scenario started");
        let page = SandboxPage::new(self.session.clone(), &self.base_url);
        let start = Instant::now();
        let result = AssertUnwindSafe((scenario.run)(page)).catch_unwind().await;
        let elapsed = start.elapsed();
        let error = match result {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(_) => Some("scenario panicked".to_string()),
        };
        match error {
            None => {
                info!(scenario = %scenario.name, ms = elapsed.as_millis() as u64, "scenario passed");
                ScenarioOutcome::new(&scenario.name, ScenarioStatus::Passed, None, elapsed)
            }
            Some(message) => {
                warn!(scenario = %scenario.name, error = %message, "scenario failed");
                ScenarioOutcome::new(&scenario.name, ScenarioStatus::Failed, Some(message), elapsed)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mock::MockDriver;
    use crate::result::E2eError;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(Session::new(MockDriver::new()), "http://localhost:5000")
    }

    fn suite() -> ScenarioSuite {
        ScenarioSuite::new("unit")
            .with_scenario(Scenario::new("passes", "ok", |_| async { Ok(()) }))
            .with_scenario(Scenario::new("fails", "assertion", |_| async {
                Err(E2eError::assertion("boom"))
            }))
            .with_scenario(Scenario::new("panics", "panic", |_| async {
                if true {
                    panic!("unexpected");
                }
                Ok(())
            }))
            .with_scenario(Scenario::new("passes-too", "ok", |_| async { Ok(()) }))
    }

    mod suite_tests {
        use super::*;

        #[test]
        fn test_filter() {
            let suite = suite().filter("passes");
            let names: Vec<&str> = suite.scenarios().iter().map(Scenario::name).collect();
            assert_eq!(names, vec!["passes", "passes-too"]);
            assert!(!suite.is_empty());
            assert!(ScenarioSuite::new("empty").is_empty());
        }
    }

    mod runner_tests {
        use super::*;

        #[tokio::test]
        async fn test_failures_are_isolated() {
            let report = runner().run(&suite()).await;
            assert_eq!(report.outcomes.len(), 4);
            assert_eq!(report.passed_count(), 2);
            assert_eq!(report.failed_count(), 2);
            assert!(!report.all_passed());
            assert_eq!(
                report.failures()[0].error.as_deref(),
                Some("Assertion failed: boom")
            );
            assert_eq!(report.failures()[1].error.as_deref(), Some("scenario panicked"));
            assert_eq!(report.outcomes[3].status, ScenarioStatus::Passed);
        }

        #[tokio::test]
        async fn test_fail_fast_skips_the_rest() {
            let report = runner().with_fail_fast(true).run(&suite()).await;
            let statuses: Vec<ScenarioStatus> = report.outcomes.iter().map(|o| o.status).collect();
            assert_eq!(
                statuses,
                vec![
                    ScenarioStatus::Passed,
                    ScenarioStatus::Failed,
                    ScenarioStatus::Skipped,
                    ScenarioStatus::Skipped
                ]
            );
        }

        #[tokio::test]
        async fn test_report_json() {
            let report = runner().run(&suite().filter("fails")).await;
            let json = report.to_json().unwrap();
            assert!(json.contains("\"status\": \"failed\""));
            let parsed: SuiteReport = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.run_id, report.run_id);
            assert_eq!(parsed.outcomes, report.outcomes);
        }
    }
}
