//! The ordered login scenarios.
//!
//! Scenarios share one page and one browser session, so order matters: the
//! presence check only reads, the blank-submit check leaves an error banner
//! behind, and the invalid-credentials check overwrites both fields. That
//! leftover banner is why the invalid-credentials check waits for a message
//! different from whatever the banner read before it submitted.

use crate::driver::PageDriver;
use crate::harness::Outcome;
use crate::locator::Role;
use crate::page::LoginPage;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Pause before re-checking the validation banner after a blank submit
pub const VALIDATION_RECHECK_DELAY: Duration = Duration::from_millis(300);

/// Credentials that must be rejected by the server
pub const INVALID_EMAIL: &str = "fake@example.com";

/// Password paired with [`INVALID_EMAIL`]
pub const INVALID_PASSWORD: &str = "wrongpassword";

/// One scenario of the login suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginScenario {
    /// Email, password and submit controls are present
    PresenceOfElements,
    /// Submitting blank fields shows a validation error
    BlankSubmit,
    /// Invalid credentials show an error message
    InvalidCredentials,
    /// Eye icon toggles password masking
    PasswordMaskingToggle,
}

impl LoginScenario {
    /// All scenarios in execution order
    pub const ALL: [Self; 4] = [
        Self::PresenceOfElements,
        Self::BlankSubmit,
        Self::InvalidCredentials,
        Self::PasswordMaskingToggle,
    ];

    /// Position in the suite, starting at 1
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::PresenceOfElements => 1,
            Self::BlankSubmit => 2,
            Self::InvalidCredentials => 3,
            Self::PasswordMaskingToggle => 4,
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PresenceOfElements => {
                "Validate presence of Email, Password, Login Button, and Eye Icon"
            }
            Self::BlankSubmit => "Attempt login with blank fields",
            Self::InvalidCredentials => "Invalid credentials should show error message",
            Self::PasswordMaskingToggle => "Validate password masking toggle works",
        }
    }

    /// Run against an opened login page
    pub async fn run<D: PageDriver>(self, page: &LoginPage<'_, D>) -> Outcome {
        info!(scenario = self.name(), order = self.order(), "running scenario");
        let outcome = match self {
            Self::PresenceOfElements => presence_of_elements(page).await,
            Self::BlankSubmit => blank_submit(page).await,
            Self::InvalidCredentials => invalid_credentials(page).await,
            Self::PasswordMaskingToggle => password_masking_toggle(page).await,
        };
        outcome.unwrap_or_else(|err| Outcome::from_error(&err))
    }
}

impl std::fmt::Display for LoginScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.order(), self.name())
    }
}

async fn presence_of_elements<D: PageDriver>(page: &LoginPage<'_, D>) -> ProbeResult<Outcome> {
    let required = [
        (Role::EmailInput, "Email field should be present"),
        (Role::PasswordInput, "Password field should be present"),
        (Role::SubmitControl, "Login button should be present"),
    ];
    for (role, message) in required {
        if !page.is_present(role).await {
            return Ok(Outcome::failed(message));
        }
    }
    let has_eye = page.is_present(Role::VisibilityToggle).await;
    debug!(has_eye, "optional eye icon");
    Ok(Outcome::Passed)
}

async fn blank_submit<D: PageDriver>(page: &LoginPage<'_, D>) -> ProbeResult<Outcome> {
    page.clear_fields().await?;
    page.click_login().await?;

    let mut shown = page.is_validation_error_present().await;
    if !shown {
        debug!("validation error not shown yet, checking once more");
        tokio::time::sleep(VALIDATION_RECHECK_DELAY).await;
        shown = page.is_validation_error_present().await;
    }

    Ok(if shown {
        Outcome::Passed
    } else {
        Outcome::failed("Expected validation error when fields are empty")
    })
}

async fn invalid_credentials<D: PageDriver>(page: &LoginPage<'_, D>) -> ProbeResult<Outcome> {
    let stale = page.current_error_text().await;
    page.enter_email(INVALID_EMAIL).await?;
    page.enter_password(INVALID_PASSWORD).await?;
    page.click_login().await?;

    let error = match stale.as_deref() {
        Some(stale) => page.error_message_replacing(stale).await,
        None => page.error_message().await,
    };
    Ok(match (error.is_empty(), stale) {
        (false, _) => {
            debug!(%error, "server rejected credentials");
            Outcome::Passed
        }
        (true, Some(stale)) => Outcome::failed(format!(
            "Error message should change after invalid login (still {stale:?})"
        )),
        (true, None) => Outcome::failed("Error message should not be empty"),
    })
}

async fn password_masking_toggle<D: PageDriver>(page: &LoginPage<'_, D>) -> ProbeResult<Outcome> {
    if !page.is_present(Role::VisibilityToggle).await {
        return Ok(Outcome::skipped(
            "Eye icon not present on this page, skipping toggle test",
        ));
    }

    let before = page.password_field_type().await?;
    if !page.toggle_password_visibility().await? {
        return Ok(Outcome::skipped("Eye icon disappeared before it could be clicked"));
    }
    let after = page.password_field_type().await?;

    match (before, after) {
        (Some(before), Some(after)) if before == after => Ok(Outcome::failed(format!(
            "Password field should toggle between masked and unmasked on eye icon click \
             (type stayed {before:?})"
        ))),
        (_, None) => Err(ProbeError::ElementNotFound {
            role: Role::PasswordInput,
        }),
        _ => Ok(Outcome::Passed),
    }
}
