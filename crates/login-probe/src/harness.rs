//! Suite runner and results.

use crate::config::HarnessConfig;
use crate::driver::PageDriver;
use crate::page::LoginPage;
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::LoginScenario;
use crate::session::BrowserSession;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Outcome of a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Every assertion held
    Passed,
    /// An assertion failed or an operation errored
    Failed {
        /// What went wrong
        message: String,
    },
    /// The scenario did not apply to this page
    Skipped {
        /// Why it was skipped
        reason: String,
    },
}

impl Outcome {
    /// Create a failed outcome
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Failure naming the kind of error and its detail
    #[must_use]
    pub fn from_error(err: &ProbeError) -> Self {
        Self::failed(format!("{}: {err}", err.kind()))
    }

    /// Check if passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if failed
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Check if skipped
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario that ran
    pub scenario: LoginScenario,
    /// What happened
    pub outcome: Outcome,
    /// Scenario duration
    pub duration: Duration,
}

/// Results from running the suite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Individual scenario results, in execution order
    pub results: Vec<ScenarioResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if no scenario failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.results.iter().any(|r| r.outcome.is_failed())
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results.iter().filter(|r| r.outcome.is_failed()).collect()
    }
}

/// Runs scenarios in their fixed order against one page
#[derive(Debug, Default, Clone, Copy)]
pub struct SuiteRunner {
    /// Whether to skip the remaining scenarios after the first failure
    pub fail_fast: bool,
}

impl SuiteRunner {
    /// Create a new runner
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run `scenarios` against an opened page.
    ///
    /// Scenarios always execute in [`LoginScenario::order`], whatever order
    /// they were passed in; duplicates run once.
    pub async fn run<D: PageDriver>(
        &self,
        page: &LoginPage<'_, D>,
        scenarios: &[LoginScenario],
    ) -> SuiteResults {
        let start = Instant::now();
        let mut ordered = scenarios.to_vec();
        ordered.sort_by_key(|s| s.order());
        ordered.dedup();

        let mut results = Vec::with_capacity(ordered.len());
        let mut stopped = false;
        for scenario in ordered {
            let scenario_start = Instant::now();
            let outcome = if stopped {
                Outcome::skipped("skipped after an earlier failure")
            } else {
                scenario.run(page).await
            };
            if outcome.is_failed() {
                warn!(%scenario, ?outcome, "scenario failed");
                stopped = self.fail_fast;
            }
            results.push(ScenarioResult {
                scenario,
                outcome,
                duration: scenario_start.elapsed(),
            });
        }

        let results = SuiteResults {
            results,
            duration: start.elapsed(),
        };
        info!(
            passed = results.passed_count(),
            failed = results.failed_count(),
            skipped = results.skipped_count(),
            "suite finished"
        );
        results
    }
}

/// Open the login page on `driver`, run the suite, and quit the browser.
///
/// Fails only when the page cannot be opened; scenario failures are reported
/// in the returned [`SuiteResults`].
pub async fn run_suite<D: PageDriver>(
    driver: D,
    config: &HarnessConfig,
    runner: SuiteRunner,
    scenarios: &[LoginScenario],
) -> ProbeResult<SuiteResults> {
    let session = BrowserSession::new(driver);
    let results = session
        .scoped(|driver| async move {
            let mut page = LoginPage::new(driver, config);
            page.open().await?;
            Ok(runner.run(&page, scenarios).await)
        })
        .await;
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timeouts;
    use crate::fake_page::{FakeNode, FakePage};
    use crate::locator::{Role, Selector};
    use crate::wait::RetryPolicy;

    fn fast_config() -> HarnessConfig {
        HarnessConfig::new()
            .with_base_url("http://login.test/")
            .with_timeouts(Timeouts::uniform(150, 5))
            .with_retry(RetryPolicy::default().with_backoff(1))
    }

    fn result(scenario: LoginScenario, outcome: Outcome) -> ScenarioResult {
        ScenarioResult {
            scenario,
            outcome,
            duration: Duration::ZERO,
        }
    }

    mod results_tests {
        use super::*;

        #[test]
        fn test_counts_and_failures() {
            let results = SuiteResults {
                results: vec![
                    result(LoginScenario::PresenceOfElements, Outcome::Passed),
                    result(LoginScenario::BlankSubmit, Outcome::failed("no banner")),
                    result(LoginScenario::PasswordMaskingToggle, Outcome::skipped("no eye")),
                ],
                duration: Duration::ZERO,
            };
            assert_eq!(results.total(), 3);
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.skipped_count(), 1);
            assert!(!results.all_passed());
            assert_eq!(results.failures()[0].scenario, LoginScenario::BlankSubmit);
        }

        #[test]
        fn test_skips_do_not_fail_the_suite() {
            let results = SuiteResults {
                results: vec![result(
                    LoginScenario::PasswordMaskingToggle,
                    Outcome::skipped("no eye"),
                )],
                duration: Duration::ZERO,
            };
            assert!(results.all_passed());
        }

        #[test]
        fn test_outcome_from_error_names_kind() {
            let outcome = Outcome::from_error(&ProbeError::ElementNotFound {
                role: Role::SubmitControl,
            });
            match outcome {
                Outcome::Failed { message } => {
                    assert!(message.starts_with("not found:"));
                    assert!(message.contains("submit control"));
                }
                other => panic!("expected failure, got {other:?}"),
            }
        }

        #[test]
        fn test_outcome_serializes_with_status_tag() {
            let json = serde_json::to_string(&Outcome::skipped("no eye")).unwrap();
            assert_eq!(json, r#"{"status":"skipped","reason":"no eye"}"#);
        }
    }

    mod runner_tests {
        use super::*;

        #[tokio::test]
        async fn test_runs_in_fixed_order_regardless_of_input() {
            let page = FakePage::login_form();
            let config = fast_config();
            let mut login = LoginPage::new(&page, &config);
            login.open().await.unwrap();

            let mut shuffled = LoginScenario::ALL.to_vec();
            shuffled.reverse();
            let results = SuiteRunner::new().run(&login, &shuffled).await;

            let order: Vec<_> = results.results.iter().map(|r| r.scenario).collect();
            assert_eq!(order, LoginScenario::ALL.to_vec());
            assert!(results.all_passed(), "{:?}", results.failures());
            assert_eq!(results.passed_count(), 4);
        }

        #[tokio::test]
        async fn test_fail_fast_skips_remaining() {
            let page = FakePage::new();
            let _ = page.add_node(FakeNode::new("email").matching(Selector::id("formEmail")));
            let config = fast_config();
            let mut login = LoginPage::new(&page, &config);
            login.open().await.unwrap();

            let results = SuiteRunner::new()
                .with_fail_fast()
                .run(&login, &LoginScenario::ALL)
                .await;
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.skipped_count(), 3);
            assert!(!page.was_called("click"));
        }

        #[tokio::test]
        async fn test_collects_all_failures_by_default() {
            let page = FakePage::login_form_without_toggle();
            let submit = page.with_dom(|dom| dom.find_key("submit")).unwrap();
            page.on_click(submit, |_| {});
            let config = fast_config();
            let mut login = LoginPage::new(&page, &config);
            login.open().await.unwrap();

            let results = SuiteRunner::new().run(&login, &LoginScenario::ALL).await;
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 2);
            assert_eq!(results.skipped_count(), 1);
        }
    }

    mod run_suite_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_run_quits_browser() {
            let page = FakePage::login_form();
            let results = run_suite(
                page.clone(),
                &fast_config(),
                SuiteRunner::new(),
                &LoginScenario::ALL,
            )
            .await
            .unwrap();

            assert!(results.all_passed());
            assert!(page.is_quit());
            assert!(page.calls().first().unwrap().starts_with("navigate:"));
            assert_eq!(page.calls().last().unwrap(), "quit");
        }

        #[tokio::test]
        async fn test_unreachable_page_still_quits() {
            let page = FakePage::new();
            let err = run_suite(
                page.clone(),
                &fast_config(),
                SuiteRunner::new(),
                &LoginScenario::ALL,
            )
            .await
            .unwrap_err();

            assert!(matches!(err, ProbeError::Timeout { .. }));
            assert!(page.is_quit());
        }
    }
}
