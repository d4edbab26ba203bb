//! Login page object.
//!
//! [`LoginPage`] exposes intention-revealing operations over the login form.
//! Every call re-resolves its elements through the [`ElementResolver`]; no
//! element handle outlives the call that produced it.
//!
//! ```text
//!   open() ──► navigate(base_url) ──► wait: email | password present
//!
//!   enter_email(x)          click_login()
//!     require(role)           require(submit)
//!     retry {                 retry {
//!       wait clickable          wait clickable
//!       scroll                  scroll
//!       click, clear, type      click
//!     }                       }
//! ```
//!
//! Optional controls are reported through return values: a missing eye icon
//! makes [`LoginPage::toggle_password_visibility`] return `false`, and the
//! error-banner reads never fail.

use crate::config::{HarnessConfig, Timeouts};
use crate::driver::{DomElement, PageDriver};
use crate::locator::{Role, RoleLocators};
use crate::resolver::{ElementResolver, ResolvePolicy};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_until, retry_transient, RetryPolicy};
use tracing::{debug, info, warn};

/// Lifecycle of the page object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// `open()` has not completed
    Unopened,
    /// Login form was reached
    Opened,
}

/// Page object for the login form
pub struct LoginPage<'a, D: PageDriver> {
    driver: &'a D,
    base_url: String,
    locators: RoleLocators,
    policy: ResolvePolicy,
    timeouts: Timeouts,
    retry: RetryPolicy,
    state: PageState,
}

impl<D: PageDriver> std::fmt::Debug for LoginPage<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginPage")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .field("timeouts", &self.timeouts)
            .field("retry", &self.retry)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, D: PageDriver> LoginPage<'a, D> {
    /// Bind a page object to a live driver
    #[must_use]
    pub fn new(driver: &'a D, config: &HarnessConfig) -> Self {
        Self {
            driver,
            base_url: config.base_url.clone(),
            locators: config.locators.clone(),
            policy: config.resolve_policy,
            timeouts: config.timeouts,
            retry: config.retry,
            state: PageState::Unopened,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> PageState {
        self.state
    }

    /// URL `open()` navigates to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolver over this page's locators
    #[must_use]
    pub fn resolver(&self) -> ElementResolver<'_, D> {
        ElementResolver::new(self.driver, &self.locators).with_policy(self.policy)
    }

    // =========================================================================
    // NAVIGATION & QUERIES
    // =========================================================================

    /// Navigate to the base URL and wait for the form to render
    pub async fn open(&mut self) -> ProbeResult<()> {
        info!(url = %self.base_url, "opening login page");
        self.driver.navigate(&self.base_url).await?;

        let resolver = self.resolver();
        let resolver = &resolver;
        let ready = poll_until(
            &self.timeouts.page_ready(),
            "the email or password input",
            move || async move {
                let ready = resolver.is_present(Role::EmailInput).await
                    || resolver.is_present(Role::PasswordInput).await;
                ready.then_some(())
            },
        )
        .await?;

        debug!(elapsed = ?ready.elapsed, "login form ready");
        self.state = PageState::Opened;
        Ok(())
    }

    /// Whether a role resolves right now, without waiting
    pub async fn is_present(&self, role: Role) -> bool {
        self.resolver().is_present(role).await
    }

    /// Current value of an input role, `None` when absent
    pub async fn field_value(&self, role: Role) -> ProbeResult<Option<String>> {
        match self.resolver().resolve(role).await {
            Some(element) => element.value().await.map(Some).map_err(|e| e.for_role(role)),
            None => Ok(None),
        }
    }

    /// Rendered `type` of the password input (`password` while masked).
    ///
    /// `None` only when the input is absent; a missing attribute reads as
    /// `text`, the HTML default.
    pub async fn password_field_type(&self) -> ProbeResult<Option<String>> {
        match self.resolver().resolve(Role::PasswordInput).await {
            Some(element) => element
                .attribute("type")
                .await
                .map(|kind| Some(kind.unwrap_or_else(|| "text".to_string())))
                .map_err(|e| e.for_role(Role::PasswordInput)),
            None => Ok(None),
        }
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Empty both credential inputs.
    ///
    /// Each field is handled independently; a missing field is skipped and
    /// does not prevent the other from being cleared. The first interaction
    /// failure is returned after both fields were attempted.
    pub async fn clear_fields(&self) -> ProbeResult<()> {
        self.note_unopened("clear_fields");
        let mut first_error = None;

        for role in [Role::EmailInput, Role::PasswordInput] {
            if !self.is_present(role).await {
                debug!(%role, "field absent, nothing to clear");
                continue;
            }
            let cleared = retry_transient(&self.retry, role.label(), move || async move {
                let element = self.require(role).await?;
                self.scroll_best_effort(&element, role).await;
                element.clear().await.map_err(|e| e.for_role(role))
            })
            .await;
            if let Err(err) = cleared {
                warn!(%role, error = %err, "could not clear field");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Replace the email input's content with `email`
    pub async fn enter_email(&self, email: &str) -> ProbeResult<()> {
        self.fill(Role::EmailInput, email).await
    }

    /// Replace the password input's content with `password`
    pub async fn enter_password(&self, password: &str) -> ProbeResult<()> {
        self.fill(Role::PasswordInput, password).await
    }

    /// Click the log-in button
    pub async fn click_login(&self) -> ProbeResult<()> {
        let role = Role::SubmitControl;
        self.note_unopened("click_login");
        let _ = self.require(role).await?;

        retry_transient(&self.retry, role.label(), move || async move {
            let element = self.wait_clickable(role).await?;
            self.scroll_best_effort(&element, role).await;
            element.click().await.map_err(|e| e.for_role(role))
        })
        .await?;
        info!("submitted login form");
        Ok(())
    }

    /// Click the eye icon if the page has one.
    ///
    /// Returns `false` without touching the page when no toggle resolves.
    pub async fn toggle_password_visibility(&self) -> ProbeResult<bool> {
        let role = Role::VisibilityToggle;
        if !self.is_present(role).await {
            debug!("no password visibility toggle on this page");
            return Ok(false);
        }

        retry_transient(&self.retry, role.label(), move || async move {
            let element = self.require(role).await?;
            self.scroll_best_effort(&element, role).await;
            element.click().await.map_err(|e| e.for_role(role))
        })
        .await?;
        Ok(true)
    }

    // =========================================================================
    // ERROR BANNER
    // =========================================================================

    /// Whether an error banner with visible text appears before the deadline
    pub async fn is_validation_error_present(&self) -> bool {
        let resolver = self.resolver();
        let resolver = &resolver;
        let found = poll_until(
            &self.timeouts.error(),
            "an error banner with text",
            move || async move {
                let banner = resolver.resolve(Role::ErrorBanner).await?;
                let text = banner.text().await.ok()?;
                (!text.trim().is_empty()).then_some(())
            },
        )
        .await;

        match found {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "no validation error");
                false
            }
        }
    }

    /// Trimmed error banner text, or an empty string if none appears
    pub async fn error_message(&self) -> String {
        let resolver = self.resolver();
        let resolver = &resolver;
        let banner = poll_until(&self.timeouts.error(), "the error banner", move || async move {
            resolver.resolve(Role::ErrorBanner).await
        })
        .await;

        match banner {
            Ok(found) => match found.value.text().await {
                Ok(text) => text.trim().to_string(),
                Err(err) => {
                    debug!(error = %err, "error banner went stale");
                    String::new()
                }
            },
            Err(err) => {
                debug!(error = %err, "no error banner");
                String::new()
            }
        }
    }

    /// Trimmed banner text as rendered right now, without waiting
    pub async fn current_error_text(&self) -> Option<String> {
        let banner = self.resolver().resolve(Role::ErrorBanner).await?;
        let text = banner.text().await.ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    /// Like [`Self::error_message`], but a banner still reading `stale` does
    /// not count
    pub async fn error_message_replacing(&self, stale: &str) -> String {
        let resolver = self.resolver();
        let resolver = &resolver;
        let fresh = poll_until(
            &self.timeouts.error(),
            "a new error banner message",
            move || async move {
                let banner = resolver.resolve(Role::ErrorBanner).await?;
                let text = banner.text().await.ok()?;
                let text = text.trim();
                (!text.is_empty() && text != stale).then(|| text.to_string())
            },
        )
        .await;

        match fresh {
            Ok(found) => found.value,
            Err(err) => {
                debug!(error = %err, stale, "error banner unchanged");
                String::new()
            }
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    async fn fill(&self, role: Role, text: &str) -> ProbeResult<()> {
        self.note_unopened(role.label());
        let _ = self.require(role).await?;

        retry_transient(&self.retry, role.label(), move || async move {
            let element = self.wait_clickable(role).await?;
            self.scroll_best_effort(&element, role).await;
            element.click().await.map_err(|e| e.for_role(role))?;
            element.clear().await.map_err(|e| e.for_role(role))?;
            element.send_keys(text).await.map_err(|e| e.for_role(role))
        })
        .await?;
        debug!(%role, chars = text.chars().count(), "field filled");
        Ok(())
    }

    async fn require(&self, role: Role) -> ProbeResult<D::Element> {
        self.resolver()
            .resolve(role)
            .await
            .ok_or(ProbeError::ElementNotFound { role })
    }

    async fn wait_clickable(&self, role: Role) -> ProbeResult<D::Element> {
        let resolver = self.resolver();
        let resolver = &resolver;
        let waited_for = format!("the {role} to be clickable");
        let clickable = poll_until(&self.timeouts.clickable(), &waited_for, move || async move {
            let element = resolver.resolve(role).await?;
            let visible = element.is_visible().await.unwrap_or(false);
            let enabled = element.is_enabled().await.unwrap_or(false);
            (visible && enabled).then_some(element)
        })
        .await?;
        Ok(clickable.value)
    }

    async fn scroll_best_effort(&self, element: &D::Element, role: Role) {
        if let Err(err) = element.scroll_into_view().await {
            debug!(%role, error = %err, "scroll failed, continuing");
        }
    }

    fn note_unopened(&self, operation: &str) {
        if self.state == PageState::Unopened {
            warn!(operation, "acting on login page before open()");
        }
    }
}
