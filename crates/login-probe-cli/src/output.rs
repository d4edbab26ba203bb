//! Result reporting

use console::{style, Style, Term};
use login_probe::{Outcome, ScenarioResult, SuiteResults};
use std::time::Duration;

/// Writes scenario lines and the suite summary to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    fn prefix(&self, plain: &'static str, styled: &Style, symbol: &'static str) -> String {
        if self.use_color {
            styled.apply_to(symbol).to_string()
        } else {
            plain.to_string()
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

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = self.prefix("INFO", &Style::new().blue().bold(), "ℹ");
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print one scenario line
    pub fn scenario(&self, result: &ScenarioResult) {
        let line = match &result.outcome {
            Outcome::Passed => {
                if self.quiet {
                    return;
                }
                let prefix = self.prefix("PASS", &Style::new().green().bold(), "✓");
                format!("{prefix} {} ({})", result.scenario, format_duration(result.duration))
            }
            Outcome::Failed { message } => {
                // Always print failures, even in quiet mode
                let prefix = self.prefix("FAIL", &Style::new().red().bold(), "✗");
                format!("{prefix} {}\n       {message}", result.scenario)
            }
            Outcome::Skipped { reason } => {
                if self.quiet {
                    return;
                }
                let prefix = self.prefix("SKIP", &Style::new().yellow().bold(), "○");
                format!("{prefix} {} ({reason})", result.scenario)
            }
        };
        let _ = self.term.write_line(&line);
    }

    /// Print every scenario and the summary
    pub fn suite(&self, results: &SuiteResults) {
        for result in &results.results {
            self.scenario(result);
        }
        self.summary(results);
    }

    /// Print the suite summary
    pub fn summary(&self, results: &SuiteResults) {
        let failed = results.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&summary_line(results, self.use_color));
    }
}

/// One-line summary, e.g. `PASSED 4 scenarios in 3.10s (3 passed, 0 failed, 1 skipped)`
#[must_use]
pub fn summary_line(results: &SuiteResults, use_color: bool) -> String {
    let passed = results.passed_count();
    let failed = results.failed_count();
    let skipped = results.skipped_count();
    let total = results.total();
    let secs = results.duration.as_secs_f64();

    if use_color {
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
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs() > 0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use login_probe::LoginScenario;

    fn results() -> SuiteResults {
        SuiteResults {
            results: vec![
                ScenarioResult {
                    scenario: LoginScenario::PresenceOfElements,
                    outcome: Outcome::Passed,
                    duration: Duration::from_millis(40),
                },
                ScenarioResult {
                    scenario: LoginScenario::PasswordMaskingToggle,
                    outcome: Outcome::skipped("no eye icon"),
                    duration: Duration::ZERO,
                },
            ],
            duration: Duration::from_millis(1500),
        }
    }

    #[test]
    fn test_plain_summary_line() {
        assert_eq!(
            summary_line(&results(), false),
            "PASSED 2 scenarios in 1.50s (1 passed, 0 failed, 1 skipped)"
        );
    }

    #[test]
    fn test_failed_summary_line() {
        let mut results = results();
        results.results[0].outcome = Outcome::failed("Email field should be present");
        assert!(summary_line(&results, false).starts_with("FAILED"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.50s");
    }

    #[test]
    fn test_reporter_prefixes() {
        let plain = Reporter::new(false, false);
        assert_eq!(plain.prefix("PASS", &Style::new(), "✓"), "PASS");
        let colored = Reporter::new(true, false);
        assert!(colored.prefix("PASS", &Style::new().green(), "✓").contains('✓'));
    }
}
