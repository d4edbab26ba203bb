//! Scoped browser session.
//!
//! A run owns exactly one browser session. [`BrowserSession::scoped`] lends
//! the driver to a flow and quits the browser afterwards, whether the flow
//! returned `Ok`, returned `Err`, or panicked.
//!
//! ```ignore
//! let session = BrowserSession::new(driver);
//! let results = session.scoped(|driver| async move { /* ... */ }).await?;
//! ```

use crate::driver::PageDriver;
use crate::result::ProbeResult;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Owned browser session
#[derive(Debug)]
pub struct BrowserSession<D: PageDriver> {
    driver: D,
    active: AtomicBool,
}

impl<D: PageDriver> BrowserSession<D> {
    /// Take ownership of a freshly launched driver
    #[must_use]
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            active: AtomicBool::new(true),
        }
    }

    /// Borrow the driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Whether `release()` has not run yet
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Quit the browser. Subsequent calls are no-ops.
    pub async fn release(&self) -> ProbeResult<()> {
        if !self.active.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        info!("closing browser session");
        self.driver.quit().await
    }

    /// Run `flow` against the driver, then release the session on every exit path.
    ///
    /// A panic inside `flow` is re-raised after the browser was quit. A quit
    /// failure is logged and only reported when the flow itself succeeded.
    pub async fn scoped<'a, T, F, Fut>(&'a self, flow: F) -> ProbeResult<T>
    where
        F: FnOnce(&'a D) -> Fut,
        Fut: Future<Output = ProbeResult<T>> + 'a,
    {
        debug!("browser session acquired");
        let outcome = AssertUnwindSafe(flow(&self.driver)).catch_unwind().await;
        let released = self.release().await;

        match outcome {
            Err(panic) => {
                if let Err(err) = released {
                    warn!(error = %err, "quit failed while unwinding");
                }
                std::panic::resume_unwind(panic)
            }
            Ok(Err(err)) => {
                if let Err(quit_err) = released {
                    warn!(error = %quit_err, "quit failed after flow error");
                }
                Err(err)
            }
            Ok(Ok(value)) => released.map(|()| value),
        }
    }
}

impl<D: PageDriver> Drop for BrowserSession<D> {
    fn drop(&mut self) {
        if *self.active.get_mut() {
            warn!("browser session dropped without release()");
        }
    }
}
