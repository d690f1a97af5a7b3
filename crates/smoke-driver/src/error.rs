//! Error types for the smoke-test driver.
//!
//! # Error Hierarchy
//!
//! ```text
//! Error (top-level)
//! ├── Driver(DriverError)
//! ├── Process(ProcessError)
//! ├── Timeout { description, elapsed, last_error }
//! ├── ExitVetoed
//! ├── ExitTimedOut { after }
//! ├── Stopped
//! ├── Config(String)
//! ├── Localization(String)
//! └── Io(std::io::Error)
//! ```

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for the driver crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the remote driver.
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Error managing an application process.
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// A poll exhausted its retry budget.
    ///
    /// `last_error` holds the failure of the final attempt, or the reason the
    /// last result was rejected.
    #[error("Timeout: {description} after {} seconds.", .elapsed.as_secs_f64())]
    Timeout {
        /// What was being waited for.
        description: String,
        /// Time spent polling.
        elapsed: Duration,
        /// Last recorded fetch failure.
        last_error: String,
    },

    /// The application refused to exit.
    #[error("Smoke test exit call resulted in unexpected veto")]
    ExitVetoed,

    /// The application process did not terminate after the exit request.
    #[error("Smoke test exit call did not terminate process after {}s, giving up", .after.as_secs())]
    ExitTimedOut {
        /// How long the harness waited.
        after: Duration,
    },

    /// Teardown already started; no new instances may be launched.
    #[error("Smoke test process has terminated, refusing to spawn Code")]
    Stopped,

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Locale or localized strings did not match the expectation.
    #[error("Localization error: {0}")]
    Localization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Build a localization error.
    pub fn localization(message: impl Into<String>) -> Self {
        Self::Localization(message.into())
    }

    /// Whether the error came from a poll running out of retries.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors reported by a [`Driver`](crate::driver::Driver) implementation.
#[derive(Debug, Error)]
pub enum DriverError {
    /// No element matched the selector.
    #[error("Element not found for selector '{selector}'")]
    ElementNotFound {
        /// Selector that was queried.
        selector: String,
    },

    /// The application has no open windows.
    #[error("No windows are open")]
    NoWindows,

    /// The driver does not support the requested operation.
    #[error("Operation not supported by this driver: {0}")]
    Unsupported(&'static str),

    /// Failure reported by the remote end.
    #[error("{0}")]
    Remote(String),
}

impl DriverError {
    /// Build a remote failure.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}

/// Errors managing application processes.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The spawned child exposed no process id.
    #[error("Failed to get process ID from child")]
    MissingPid,

    /// No registered instance has the given id.
    #[error("Instance not found: {0}")]
    NotFound(String),

    /// Sending a signal to the process failed.
    #[error("Failed to signal process {pid}: {reason}")]
    SignalFailed {
        /// Target process id.
        pid: u32,
        /// Reason reported by the system.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let error = Error::Timeout {
            description: "get title".to_string(),
            elapsed: Duration::from_millis(1500),
            last_error: "Did not pass accept function".to_string(),
        };
        assert_eq!(error.to_string(), "Timeout: get title after 1.5 seconds.");
        assert!(error.is_timeout());
    }

    #[test]
    fn test_driver_error_converts() {
        let error: Error = DriverError::ElementNotFound {
            selector: ".monaco-workbench".to_string(),
        }
        .into();
        assert!(matches!(error, Error::Driver(DriverError::ElementNotFound { .. })));
        assert!(!error.is_timeout());
    }

    #[test]
    fn test_exit_timed_out_message() {
        let error = Error::ExitTimedOut {
            after: Duration::from_secs(20),
        };
        assert_eq!(
            error.to_string(),
            "Smoke test exit call did not terminate process after 20s, giving up"
        );
    }
}
