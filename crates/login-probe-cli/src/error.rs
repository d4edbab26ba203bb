//! Error types for the CLI

use std::process::ExitCode;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Test execution error
    #[error("Test execution failed: {message}")]
    TestExecution {
        /// Error message
        message: String,
    },

    /// One or more scenarios failed
    #[error("{failed} of {total} scenario(s) failed")]
    SuiteFailed {
        /// Failed scenarios
        failed: usize,
        /// Scenarios run
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// login-probe library error
    #[error("{0}")]
    Probe(#[from] login_probe::ProbeError),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a test execution error
    #[must_use]
    pub fn test_execution(message: impl Into<String>) -> Self {
        Self::TestExecution {
            message: message.into(),
        }
    }

    /// Process exit code: 1 for failed scenarios, 2 for anything that
    /// prevented the suite from running.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::SuiteFailed { .. } => ExitCode::from(1),
            _ => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use login_probe::{ProbeError, Role};

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
    }

    #[test]
    fn test_test_execution_error() {
        let err = CliError::test_execution("runtime");
        assert!(err.to_string().contains("Test execution"));
    }

    #[test]
    fn test_suite_failed_message() {
        let err = CliError::SuiteFailed { failed: 2, total: 4 };
        assert_eq!(err.to_string(), "2 of 4 scenario(s) failed");
        assert_eq!(err.exit_code(), ExitCode::from(1));
    }

    #[test]
    fn test_probe_error_is_transparent() {
        let err: CliError = ProbeError::ElementNotFound {
            role: Role::EmailInput,
        }
        .into();
        assert!(err.to_string().contains("email input"));
        assert_eq!(err.exit_code(), ExitCode::from(2));
    }
}
