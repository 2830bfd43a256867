//! Result and error types for sep-e2e.

use thiserror::Error;

/// Result type for page-object and driver operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving the sandbox UI
#[derive(Debug, Error)]
pub enum E2eError {
    /// A page object was constructed without its wrapper element
    #[error("Page object {page} requires a wrapper element")]
    MissingWrapper {
        /// Page object type name
        page: String,
    },

    /// A runtime page object was built without a readiness gate
    #[error("Page object {page} has no readiness check")]
    MissingReadiness {
        /// Page object name
        page: String,
    },

    /// A polled predicate did not hold within the timeout
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of the predicate
        waited_for: String,
    },

    /// Expectation did not match the observed value
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// No element matched a selector
    #[error("No element matches {selector}")]
    NoSuchElement {
        /// Selector description
        selector: String,
    },

    /// Element reference no longer points at a live node
    #[error("Stale element reference: {element}")]
    StaleElement {
        /// Element id
        element: String,
    },

    /// Element exists but cannot receive the interaction
    #[error("Element {element} is not interactable: {message}")]
    NotInteractable {
        /// Element id
        element: String,
        /// Error message
        message: String,
    },

    /// Selector could not be parsed
    #[error("Invalid selector {selector}: {message}")]
    InvalidSelector {
        /// Selector text
        selector: String,
        /// Error message
        message: String,
    },

    /// Driver does not support the selector strategy
    #[error("Selector strategy not supported by this driver: {selector}")]
    UnsupportedSelector {
        /// Selector description
        selector: String,
    },

    /// Script execution in page context failed
    #[error("Script execution failed: {message}")]
    Script {
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

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl E2eError {
    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a script error
    #[must_use]
    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
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

    /// Whether this is a wait expiry
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error was raised while constructing a page object
    #[must_use]
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::MissingWrapper { .. } | Self::MissingReadiness { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = E2eError::Timeout {
            ms: 250,
            waited_for: "visibility of .modal-dialog".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for visibility of .modal-dialog"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_construction_errors() {
        let missing = E2eError::MissingWrapper {
            page: "Dialog".to_string(),
        };
        assert!(missing.is_construction_error());
        assert!(!E2eError::assertion("x").is_construction_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: E2eError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
