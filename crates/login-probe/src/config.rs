//! Harness configuration.
//!
//! Everything here is pass-through: the base URL and browser flags only reach
//! the driver, and the timeouts only parameterize the shared wait utility.
//! Configuration can be built in code or loaded from YAML:
//!
//! ```yaml
//! base_url: https://dev-dash.janitri.in/
//! browser:
//!   headless: true
//! timeouts:
//!   page_ready_ms: 20000
//! locators:
//!   visibility_toggle:
//!     - css: "button[aria-label='Show password']"
//! ```

use crate::locator::RoleLocators;
use crate::resolver::ResolvePolicy;
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{RetryPolicy, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default login page
pub const DEFAULT_BASE_URL: &str = "https://dev-dash.janitri.in/";

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Extra command-line switches
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: 1920,
            window_height: 1080,
            chromium_path: None,
            sandbox: true,
            extra_args: vec![
                "--disable-infobars".to_string(),
                "--disable-notifications".to_string(),
            ],
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Deadlines for every bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Page readiness after navigation
    pub page_ready_ms: u64,
    /// Element becoming clickable
    pub clickable_ms: u64,
    /// Error banner appearing
    pub error_ms: u64,
    /// Driver-level page load
    pub navigation_ms: u64,
    /// Polling interval shared by all waits
    pub poll_interval_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            page_ready_ms: DEFAULT_WAIT_TIMEOUT_MS,
            clickable_ms: 5_000,
            error_ms: DEFAULT_WAIT_TIMEOUT_MS,
            navigation_ms: 30_000,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Timeouts {
    /// Uniform timeouts, handy for tests against an in-memory page
    #[must_use]
    pub const fn uniform(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            page_ready_ms: timeout_ms,
            clickable_ms: timeout_ms,
            error_ms: timeout_ms,
            navigation_ms: timeout_ms,
            poll_interval_ms,
        }
    }

    fn options(&self, timeout_ms: u64) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
    }

    /// Wait options for page readiness
    #[must_use]
    pub fn page_ready(&self) -> WaitOptions {
        self.options(self.page_ready_ms)
    }

    /// Wait options for clickability
    #[must_use]
    pub fn clickable(&self) -> WaitOptions {
        self.options(self.clickable_ms)
    }

    /// Wait options for the error banner
    #[must_use]
    pub fn error(&self) -> WaitOptions {
        self.options(self.error_ms)
    }

    /// Navigation timeout
    #[must_use]
    pub const fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }
}

/// Complete harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Login page URL
    pub base_url: String,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Wait deadlines
    pub timeouts: Timeouts,
    /// Retry policy for transient interaction errors
    pub retry: RetryPolicy,
    /// Element resolution policy
    pub resolve_policy: ResolvePolicy,
    /// Candidate selectors per role
    pub locators: RoleLocators,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserConfig::default(),
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
            resolve_policy: ResolvePolicy::default(),
            locators: RoleLocators::default(),
        }
    }
}

impl HarnessConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML text and validate
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file and validate
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.browser.headless = headless;
        self
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set resolution policy
    #[must_use]
    pub const fn with_resolve_policy(mut self, policy: ResolvePolicy) -> Self {
        self.resolve_policy = policy;
        self
    }

    /// Set candidate selectors
    #[must_use]
    pub fn with_locators(mut self, locators: RoleLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Reject configurations no run could succeed with
    pub fn validate(&self) -> ProbeResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ProbeError::config("base_url must not be empty"));
        }
        if !["http://", "https://", "file://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            return Err(ProbeError::config(format!(
                "base_url must be an http(s) or file URL, got {url}"
            )));
        }
        if self.timeouts.poll_interval_ms == 0 {
            return Err(ProbeError::config("timeouts.poll_interval_ms must be positive"));
        }
        if self.retry.attempts == 0 {
            return Err(ProbeError::config("retry.attempts must be at least 1"));
        }
        for role in crate::locator::Role::ALL {
            if role != crate::locator::Role::VisibilityToggle && self.locators.for_role(role).is_empty()
            {
                return Err(ProbeError::config(format!(
                    "locators for the {role} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
