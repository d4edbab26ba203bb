//! login-probe: browser verification harness for a web login page.
//!
//! The harness drives a real browser through a login form and checks that
//! its controls render, that blank and invalid submissions produce
//! user-facing errors, and that the password masking toggle works.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    LOGIN-PROBE Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ LoginPage  │    │ Element    │            │
//! │   │ Suite      │───►│ (facade)   │───►│ Resolver   │            │
//! │   └────────────┘    └─────┬──────┘    └─────┬──────┘            │
//! │                           │ poll_until      │ find_all          │
//! │                           ▼                 ▼                   │
//! │                     ┌──────────────────────────────┐            │
//! │                     │ PageDriver (Chromium / Fake) │            │
//! │                     └──────────────────────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use login_probe::{FakePage, HarnessConfig, LoginPage};
//!
//! # async fn demo() -> login_probe::ProbeResult<()> {
//! let driver = FakePage::login_form();
//! let config = HarnessConfig::default();
//! let mut page = LoginPage::new(&driver, &config);
//! page.open().await?;
//! page.enter_email("user@example.com").await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
/// In-memory page driver for tests and dry runs
pub mod fake_page;
mod harness;
mod locator;
mod page;
mod resolver;
mod result;
mod scenario;
mod session;
mod wait;

#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumElement};
pub use config::{BrowserConfig, HarnessConfig, Timeouts, DEFAULT_BASE_URL};
pub use driver::{DomElement, PageDriver};
pub use fake_page::{FakeElement, FakeNode, FakePage};
pub use harness::{run_suite, Outcome, ScenarioResult, SuiteResults, SuiteRunner};
pub use locator::{LocatorCandidates, Role, RoleLocators, Selector};
pub use page::{LoginPage, PageState};
pub use resolver::{ElementResolver, ResolvePolicy};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{LoginScenario, INVALID_EMAIL, INVALID_PASSWORD, VALIDATION_RECHECK_DELAY};
pub use session::BrowserSession;
pub use wait::{
    poll_until, retry_transient, RetryPolicy, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
