//! Result and error types for shopcheck.

use std::time::Duration;
use thiserror::Error;

/// Result type for shopcheck operations
pub type SuiteResult<T> = Result<T, SuiteError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SuiteError {
    /// An element never satisfied its wait condition
    #[error("Timed out after {}ms waiting for {locator} to be {condition}", timeout.as_millis())]
    LookupTimeout {
        /// Locator that was polled
        locator: String,
        /// Condition that never held
        condition: String,
        /// Wait window that elapsed
        timeout: Duration,
    },

    /// Browser or driver process could not be started
    #[error("Browser environment failure: {message}")]
    Environment {
        /// Error message
        message: String,
    },

    /// A scenario expectation did not hold
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// Browser protocol error
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Element handle no longer matches anything in the page
    #[error("Stale element: {locator} has no match at index {index}")]
    StaleElement {
        /// Locator the handle came from
        locator: String,
        /// Index in the match list
        index: usize,
    },

    /// A locator could not be built for the given input
    #[error("Invalid locator: {message}")]
    InvalidLocator {
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

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
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

impl SuiteError {
    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
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

    /// Create an environment error
    #[must_use]
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
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

    /// Whether this error is an expired wait window
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::LookupTimeout { .. })
    }

    /// Whether this error must abort the whole run
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Environment { .. })
    }
}

/// Fail the enclosing scenario unless a condition holds.
///
/// ```ignore
/// verify!(count == 1, "Expected 1 item in cart, got {count}");
/// ```
#[macro_export]
macro_rules! verify {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::SuiteError::assertion(format!($($arg)+)));
        }
    };
}

/// Fail the enclosing scenario unless two values are equal.
#[macro_export]
macro_rules! verify_eq {
    ($left:expr, $right:expr, $($arg:tt)+) => {
        match (&$left, &$right) {
            (left, right) => {
                if left != right {
                    return Err($crate::SuiteError::assertion(format!(
                        "{}: expected {:?}, got {:?}",
                        format!($($arg)+),
                        right,
                        left
                    )));
                }
            }
        }
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_locator_and_window() {
        let err = SuiteError::LookupTimeout {
            locator: "id=login-button".to_string(),
            condition: "clickable".to_string(),
            timeout: Duration::from_secs(10),
        };
        let text = err.to_string();
        assert!(text.contains("id=login-button"));
        assert!(text.contains("clickable"));
        assert!(text.contains("10000ms"));
        assert!(err.is_timeout());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_environment_is_fatal() {
        let err = SuiteError::environment("chrome not found");
        assert!(err.is_fatal());
        assert!(err.to_string().contains("chrome not found"));
    }

    fn check_count(count: u32) -> SuiteResult<()> {
        verify!(count == 1, "Expected 1 item in cart, got {count}");
        Ok(())
    }

    fn check_title(title: &str) -> SuiteResult<()> {
        verify_eq!(title, "Products", "Incorrect page title");
        Ok(())
    }

    #[test]
    fn test_verify_macro() {
        assert!(check_count(1).is_ok());
        let err = check_count(2).unwrap_err();
        assert!(matches!(err, SuiteError::Assertion { .. }));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn test_verify_eq_macro() {
        assert!(check_title("Products").is_ok());
        let err = check_title("Your Cart").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Incorrect page title"));
        assert!(text.contains("\"Products\""));
        assert!(text.contains("\"Your Cart\""));
    }
}
