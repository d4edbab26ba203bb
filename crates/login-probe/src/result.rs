//! Result and error types for login-probe.

use crate::locator::Role;
use thiserror::Error;

/// Result type for login-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the login page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A role required for an action has no resolvable element
    #[error("Element not found: no candidate selector matched the {role}")]
    ElementNotFound {
        /// Role that could not be resolved
        role: Role,
    },

    /// A bounded wait expired
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the awaited condition
        waited_for: String,
        /// Deadline in milliseconds
        ms: u64,
    },

    /// Element was found but could not be interacted with (transient)
    #[error("Interaction with the {role} failed: {message}")]
    Interaction {
        /// Role being acted on
        role: Role,
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Driver-level failure outside a specific element interaction
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ProbeError {
    /// Create an interaction error for a role
    #[must_use]
    pub fn interaction(role: Role, message: impl Into<String>) -> Self {
        Self::Interaction {
            role,
            message: message.into(),
        }
    }

    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Attribute a driver failure to the role being acted on.
    ///
    /// Element-level driver errors become [`ProbeError::Interaction`]; every
    /// other variant passes through unchanged.
    #[must_use]
    pub fn for_role(self, role: Role) -> Self {
        match self {
            Self::Driver { message } => Self::Interaction { role, message },
            other => other,
        }
    }

    /// Whether retrying the same operation may succeed.
    ///
    /// Only interaction failures qualify; a missing element or an expired
    /// wait has already consumed its own deadline.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Interaction { .. })
    }

    /// Short failure category used in scenario reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ElementNotFound { .. } => "not found",
            Self::Timeout { .. } => "timed out",
            Self::Interaction { .. } => "interaction failed",
            Self::Navigation { .. } => "navigation failed",
            Self::BrowserLaunch { .. } | Self::Driver { .. } => "driver error",
            Self::Config { .. } | Self::Io(_) | Self::Yaml(_) => "configuration error",
        }
    }
}
