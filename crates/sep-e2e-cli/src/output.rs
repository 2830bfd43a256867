//! Terminal output of suite runs

use console::{style, Style, Term};
use sep_e2e::{ScenarioOutcome, ScenarioStatus, SuiteReport};

/// Writes scenario results and summaries
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Reporter writing to stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        let _ = self.term.write_line(&styled);
    }

    /// Print a plain line
    pub fn line(&self, text: &str) {
        if !self.quiet {
            let _ = self.term.write_line(text);
        }
    }

    /// One line per scenario outcome
    pub fn outcome(&self, outcome: &ScenarioOutcome) {
        let failed = outcome.status == ScenarioStatus::Failed;
        if self.quiet && !failed {
            return;
        }
        let _ = self.term.write_line(&format_outcome(outcome, self.use_color));
    }

    /// Print the summary line
    pub fn summary(&self, report: &SuiteReport) {
        let (passed, failed, skipped) = (
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
        );
        if self.quiet && failed == 0 {
            return;
        }
        let total = report.outcomes.len();
        let secs = report.duration_ms as f64 / 1000.0;

        let line = if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            format!(
                "{status} {total} scenarios in {secs:.2}s ({} passed, {} failed, {} skipped)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                Style::new().yellow().apply_to(skipped)
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            format!(
                "{status} {total} scenarios in {secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            )
        };
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }
}

/// Render one outcome line
#[must_use]
pub fn format_outcome(outcome: &ScenarioOutcome, use_color: bool) -> String {
    let prefix = match (outcome.status, use_color) {
        (ScenarioStatus::Passed, true) => style("✓").green().bold().to_string(),
        (ScenarioStatus::Failed, true) => style("✗").red().bold().to_string(),
        (ScenarioStatus::Skipped, true) => style("-").yellow().to_string(),
        (ScenarioStatus::Passed, false) => "PASS".to_string(),
        (ScenarioStatus::Failed, false) => "FAIL".to_string(),
        (ScenarioStatus::Skipped, false) => "SKIP".to_string(),
    };
    match &outcome.error {
        Some(error) => format!("{prefix} {} ({}ms): {error}", outcome.name, outcome.duration_ms),
        None => format!("{prefix} {} ({}ms)", outcome.name, outcome.duration_ms),
    }
}
