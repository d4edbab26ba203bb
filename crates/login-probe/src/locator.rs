//! Logical roles and their ordered candidate selectors.
//!
//! A [`Role`] names what an element is for on the login page. Each role owns a
//! [`LocatorCandidates`] list whose order encodes priority: the most specific,
//! most stable selector first and the most generic fallback last. The lists
//! are fixed when the page object is built; resolution never reorders them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// CSS selector (e.g., "button.login-button")
    Css(String),
    /// XPath selector
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a selector matching an element id
    #[must_use]
    pub fn id(id: &str) -> Self {
        Self::Css(format!("#{id}"))
    }

    /// Create a selector matching the `name` attribute
    #[must_use]
    pub fn name(name: &str) -> Self {
        Self::Css(format!("[name='{name}']"))
    }

    /// Raw selector expression
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// A logical UI purpose on the login page, decoupled from its markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Email / user id input
    EmailInput,
    /// Password input
    PasswordInput,
    /// Log-in button
    SubmitControl,
    /// Eye icon that unmasks the password
    VisibilityToggle,
    /// Validation or authentication error message
    ErrorBanner,
}

impl Role {
    /// All roles in declaration order
    pub const ALL: [Self; 5] = [
        Self::EmailInput,
        Self::PasswordInput,
        Self::SubmitControl,
        Self::VisibilityToggle,
        Self::ErrorBanner,
    ];

    /// Human-readable role name
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmailInput => "email input",
            Self::PasswordInput => "password input",
            Self::SubmitControl => "submit control",
            Self::VisibilityToggle => "visibility toggle",
            Self::ErrorBanner => "error banner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered, immutable list of candidate selectors for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocatorCandidates {
    selectors: Vec<Selector>,
}

impl LocatorCandidates {
    /// Create a candidate list; order is priority
    #[must_use]
    pub fn new(selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            selectors: selectors.into_iter().collect(),
        }
    }

    /// Candidates in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Whether the list has no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl<'a> IntoIterator for &'a LocatorCandidates {
    type Item = &'a Selector;
    type IntoIter = std::slice::Iter<'a, Selector>;

    fn into_iter(self) -> Self::IntoIter {
        self.selectors.iter()
    }
}

/// One candidate list per role.
///
/// The defaults cover the markup variants the login page has shipped with:
/// stable ids first, then `name` attributes, then class-based fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleLocators {
    /// Email input candidates
    pub email: LocatorCandidates,
    /// Password input candidates
    pub password: LocatorCandidates,
    /// Submit button candidates
    pub submit: LocatorCandidates,
    /// Visibility toggle candidates
    pub visibility_toggle: LocatorCandidates,
    /// Error banner candidates
    pub error_banner: LocatorCandidates,
}

impl Default for RoleLocators {
    fn default() -> Self {
        Self {
            email: LocatorCandidates::new([
                Selector::id("formEmail"),
                Selector::name("email"),
                Selector::css("input.login-input-field[type='text']"),
            ]),
            password: LocatorCandidates::new([
                Selector::id("formPassword"),
                Selector::name("password"),
                Selector::css("input.login-input-field[type='password']"),
            ]),
            submit: LocatorCandidates::new([
                Selector::css("button.login-button"),
                Selector::xpath("//button[contains(text(),'Log In')]"),
            ]),
            visibility_toggle: LocatorCandidates::new([Selector::css(
                "img.password-visible[alt*='Password']",
            )]),
            error_banner: LocatorCandidates::new([
                Selector::css(".error-message"),
                Selector::css("[role='alert']"),
                Selector::css(".MuiAlert-message"),
            ]),
        }
    }
}

impl RoleLocators {
    /// Candidate list owned by a role
    #[must_use]
    pub const fn for_role(&self, role: Role) -> &LocatorCandidates {
        match role {
            Role::EmailInput => &self.email,
            Role::PasswordInput => &self.password,
            Role::SubmitControl => &self.submit,
            Role::VisibilityToggle => &self.visibility_toggle,
            Role::ErrorBanner => &self.error_banner,
        }
    }

    /// Replace the candidate list of one role
    #[must_use]
    pub fn with_role(mut self, role: Role, candidates: LocatorCandidates) -> Self {
        match role {
            Role::EmailInput => self.email = candidates,
            Role::PasswordInput => self.password = candidates,
            Role::SubmitControl => self.submit = candidates,
            Role::VisibilityToggle => self.visibility_toggle = candidates,
            Role::ErrorBanner => self.error_banner = candidates,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_id_and_name_helpers() {
            assert_eq!(Selector::id("formEmail"), Selector::css("#formEmail"));
            assert_eq!(Selector::name("email"), Selector::css("[name='email']"));
        }

        #[test]
        fn test_display_prefixes_kind() {
            assert_eq!(Selector::css("a.b").to_string(), "css=a.b");
            assert_eq!(Selector::xpath("//a").to_string(), "xpath=//a");
            assert_eq!(Selector::xpath("//a").expression(), "//a");
        }

        #[test]
        fn test_yaml_shape() {
            let yaml = "- css: '#formEmail'\n- xpath: //input\n";
            let parsed: LocatorCandidates = serde_yaml_ng::from_str(yaml).unwrap();
            assert_eq!(
                parsed,
                LocatorCandidates::new([Selector::id("formEmail"), Selector::xpath("//input")])
            );
        }
    }

    mod role_tests {
        use super::*;

        #[test]
        fn test_labels() {
            assert_eq!(Role::EmailInput.to_string(), "email input");
            assert_eq!(Role::ErrorBanner.label(), "error banner");
        }

        #[test]
        fn test_every_default_role_has_candidates() {
            let locators = RoleLocators::default();
            for role in Role::ALL {
                assert!(!locators.for_role(role).is_empty(), "{role} has no candidates");
            }
        }

        #[test]
        fn test_default_priority_order() {
            let locators = RoleLocators::default();
            let email: Vec<_> = locators.for_role(Role::EmailInput).iter().collect();
            assert_eq!(email[0], &Selector::id("formEmail"));
            assert_eq!(email.len(), 3);
            let submit: Vec<_> = locators.for_role(Role::SubmitControl).iter().collect();
            assert!(matches!(submit[1], Selector::XPath(_)));
        }

        #[test]
        fn test_with_role_replaces_only_that_role() {
            let custom = LocatorCandidates::new([Selector::css("#eye")]);
            let locators = RoleLocators::default().with_role(Role::VisibilityToggle, custom.clone());
            assert_eq!(locators.for_role(Role::VisibilityToggle), &custom);
            assert_eq!(
                locators.for_role(Role::EmailInput),
                RoleLocators::default().for_role(Role::EmailInput)
            );
        }
    }
}
