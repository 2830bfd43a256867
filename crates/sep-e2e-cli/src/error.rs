//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument combination
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// At least one scenario failed
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed {
        /// Failed or skipped scenarios
        failed: usize,
        /// Scenarios in the run
        total: usize,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Library error
    #[error("{0}")]
    E2e(#[from] sep_e2e::E2eError),
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("--live needs the browser feature");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_scenarios_failed_message() {
        let err = CliError::ScenariosFailed { failed: 2, total: 11 };
        assert_eq!(err.to_string(), "2 of 11 scenarios failed");
    }

    #[test]
    fn test_library_error_is_transparent() {
        let err: CliError = sep_e2e::E2eError::config("poll_ms must be positive").into();
        assert_eq!(err.to_string(), "Configuration error: poll_ms must be positive");
    }
}
