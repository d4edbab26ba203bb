//! Deadline-based polling and transient-error retry.
//!
//! Every blocking operation on the login page goes through [`poll_until`]:
//! a probe is evaluated against live page state on a fixed interval until it
//! yields a value or the deadline elapses. There are no fixed sleeps anywhere
//! else in the crate apart from the retry backoff.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (15 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default number of attempts for transient interaction errors
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

/// Default backoff between attempts (300ms)
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 300;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Successful outcome of [`poll_until`]
#[derive(Debug, Clone)]
pub struct WaitResult<T> {
    /// Value produced by the probe
    pub value: T,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `probe` until it yields `Some`, or fail with [`ProbeError::Timeout`].
///
/// Each probe is bounded by the deadline, so a probe that stalls cannot hold
/// the wait past it. The first probe is always allowed at least one poll
/// interval, so a zero timeout degrades to a single check.
pub async fn poll_until<T, F, Fut>(
    options: &WaitOptions,
    waited_for: &str,
    mut probe: F,
) -> ProbeResult<WaitResult<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout();
    let mut probe_deadline = deadline.max(start + options.poll_interval());

    loop {
        match tokio::time::timeout_at(probe_deadline, probe()).await {
            Ok(Some(value)) => {
                let elapsed = start.elapsed();
                debug!(waited_for, ?elapsed, "wait satisfied");
                return Ok(WaitResult {
                    value,
                    elapsed,
                    waited_for: waited_for.to_string(),
                });
            }
            Ok(None) => {}
            Err(_) => {
                debug!(waited_for, "probe still pending at deadline");
                break;
            }
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        tokio::time::sleep(options.poll_interval().min(deadline - now)).await;
        probe_deadline = deadline;
    }

    debug!(waited_for, timeout_ms = options.timeout_ms, "wait timed out");
    Err(ProbeError::Timeout {
        waited_for: waited_for.to_string(),
        ms: options.timeout_ms,
    })
}

// =============================================================================
// RETRY
// =============================================================================

/// Retry policy for transient interaction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Pause between attempts in milliseconds
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    #[must_use]
    pub const fn none() -> Self {
        Self {
            attempts: 1,
            backoff_ms: 0,
        }
    }

    /// Set total attempts
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set backoff in milliseconds
    #[must_use]
    pub const fn with_backoff(mut self, backoff_ms: u64) -> Self {
        self.backoff_ms = backoff_ms;
        self
    }

    /// Backoff as Duration
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Run `op`, retrying while it fails with a transient error.
///
/// Non-transient errors and the last attempt's error are returned as-is.
pub async fn retry_transient<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> ProbeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!(what, attempt, error = %err, "transient failure, retrying");
                tokio::time::sleep(policy.backoff()).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Role;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_builders() {
            let opts = WaitOptions::new().with_timeout(5000).with_poll_interval(25);
            assert_eq!(opts.timeout(), Duration::from_secs(5));
            assert_eq!(opts.poll_interval(), Duration::from_millis(25));
        }
    }

    mod poll_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let opts = WaitOptions::new().with_timeout(1000);
            let result = poll_until(&opts, "ready", || async { Some(7) }).await.unwrap();
            assert_eq!(result.value, 7);
            assert_eq!(result.waited_for, "ready");
        }

        #[tokio::test]
        async fn test_succeeds_after_several_polls() {
            let calls = AtomicU32::new(0);
            let opts = WaitOptions::new().with_timeout(2000).with_poll_interval(5);
            let result = poll_until(&opts, "third poll", || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move { (n >= 3).then_some(n) }
            })
            .await
            .unwrap();
            assert_eq!(result.value, 3);
        }

        #[tokio::test]
        async fn test_times_out_with_description() {
            let opts = WaitOptions::new().with_timeout(50).with_poll_interval(10);
            let start = std::time::Instant::now();
            let err = poll_until(&opts, "never", || async { None::<()> })
                .await
                .unwrap_err();
            assert!(start.elapsed() >= Duration::from_millis(50));
            match err {
                ProbeError::Timeout { waited_for, ms } => {
                    assert_eq!(waited_for, "never");
                    assert_eq!(ms, 50);
                }
                other => panic!("expected timeout, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_zero_timeout_checks_once() {
            let calls = AtomicU32::new(0);
            let opts = WaitOptions::new().with_timeout(0);
            let result = poll_until(&opts, "once", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { None::<()> }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_slow_probe_is_cut_off_at_deadline() {
            let opts = WaitOptions::new().with_timeout(100).with_poll_interval(10);
            let start = std::time::Instant::now();
            let err = poll_until(&opts, "slow probe", || async {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                Some(())
            })
            .await
            .unwrap_err();
            assert!(start.elapsed() < Duration::from_millis(1000));
            assert!(matches!(err, ProbeError::Timeout { ms: 100, .. }));
        }

        #[tokio::test]
        async fn test_stalled_probe_times_out() {
            let opts = WaitOptions::new().with_timeout(100).with_poll_interval(10);
            let outcome = tokio::time::timeout(
                Duration::from_secs(2),
                poll_until(&opts, "stalled", || std::future::pending::<Option<()>>()),
            )
            .await;
            let result = outcome.expect("poll_until must return before the outer guard");
            assert!(matches!(result, Err(ProbeError::Timeout { .. })));
        }
    }

    mod retry_tests {
        use super::*;

        #[tokio::test]
        async fn test_retries_transient_then_succeeds() {
            let calls = AtomicU32::new(0);
            let policy = RetryPolicy::default().with_backoff(1);
            let value = retry_transient(&policy, "type", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ProbeError::interaction(Role::EmailInput, "not interactable"))
                    } else {
                        Ok("typed")
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(value, "typed");
            assert_eq!(calls.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_gives_up_after_attempts() {
            let calls = AtomicU32::new(0);
            let policy = RetryPolicy::default().with_attempts(3).with_backoff(1);
            let result: ProbeResult<()> = retry_transient(&policy, "click", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ProbeError::interaction(Role::SubmitControl, "covered")) }
            })
            .await;
            assert!(result.unwrap_err().is_transient());
            assert_eq!(calls.load(Ordering::SeqCst), 3);
        }

        #[tokio::test]
        async fn test_does_not_retry_element_not_found() {
            let calls = AtomicU32::new(0);
            let result: ProbeResult<()> = retry_transient(&RetryPolicy::default(), "click", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(ProbeError::ElementNotFound {
                        role: Role::SubmitControl,
                    })
                }
            })
            .await;
            assert!(result.is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }

        #[test]
        fn test_none_policy() {
            assert_eq!(RetryPolicy::none().attempts, 1);
        }
    }
}
