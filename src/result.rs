//! Test outcomes
//!
//! A run of a [`TestCase`](crate::test_case::TestCase) reduces to exactly one
//! [`TestResult`]. The status decides how a host runner renders it; the cause
//! carries the representative error, and the metadata is whatever the run
//! collected in its shared [`ExecutionContext`](crate::context::ExecutionContext).

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::Metadata;
use crate::property::Falsified;

/// Final classification of a test case run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    /// Every invocation completed without error
    Success,
    /// An assertion or property did not hold
    Failure,
    /// Any other error, including a batch timeout
    Error,
    /// The test case is inactive and was not executed
    Ignored,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TestStatus::Success => "success",
            TestStatus::Failure => "failure",
            TestStatus::Error => "error",
            TestStatus::Ignored => "ignored",
        };
        f.write_str(name)
    }
}

/// Errors a test body can produce, plus the ones the engine raises itself
#[derive(Debug, Clone, thiserror::Error)]
pub enum TestError {
    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error(transparent)]
    Falsified(#[from] Falsified),

    /// A panic in the body.
    ///
    /// Assertion-kind only when the message starts with `assertion`, as the
    /// messages of `assert!(cond)`, `assert_eq!` and `assert_ne!` do.
    /// `assert!(cond, "custom message")` panics with the bare custom message
    /// and so counts as an error, like `unwrap()` on `None` or an
    /// out-of-bounds index. Return [`TestError::assertion`] to report a
    /// custom message as a failure.
    #[error("test body panicked: {0}")]
    Panicked(String),

    #[error("test timed out after {} {}", timeout_value(.timeout), timeout_unit(.timeout))]
    Timeout { timeout: Duration },

    #[error("completion signal was dropped before the invocation completed")]
    CompletionDropped,

    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl TestError {
    /// Build an assertion-kind error from a message
    pub fn assertion(message: impl Into<String>) -> Self {
        TestError::Assertion(message.into())
    }

    /// Wrap an arbitrary error as a non-assertion error
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TestError::Other(Arc::new(error))
    }

    /// Whether this error means "the expectation did not hold" rather than
    /// "the test could not run properly".
    pub fn is_assertion(&self) -> bool {
        match self {
            TestError::Assertion(_) | TestError::Falsified(_) => true,
            TestError::Panicked(message) => message.starts_with(ASSERTION_PANIC_PREFIX),
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TestError::Timeout { .. })
    }

    /// Convert a panic payload caught with `catch_unwind`.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        TestError::Panicked(panic_message(payload.as_ref()))
    }
}

// Prefix of the messages `assert!`, `assert_eq!` and `assert_ne!` panic with.
const ASSERTION_PANIC_PREFIX: &str = "assertion";

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn timeout_value(timeout: &Duration) -> u128 {
    if timeout.subsec_nanos() == 0 {
        u128::from(timeout.as_secs())
    } else {
        timeout.as_millis()
    }
}

fn timeout_unit(timeout: &Duration) -> &'static str {
    if timeout.subsec_nanos() == 0 {
        "SECONDS"
    } else {
        "MILLISECONDS"
    }
}

/// Outcome of one test case run
#[derive(Debug, Clone)]
pub struct TestResult {
    pub status: TestStatus,
    pub cause: Option<TestError>,
    pub metadata: Option<Metadata>,
}

impl TestResult {
    pub fn success(metadata: Metadata) -> Self {
        Self {
            status: TestStatus::Success,
            cause: None,
            metadata: Some(metadata),
        }
    }

    /// Classify `error` as `Failure` or `Error` by its kind.
    pub fn from_error(error: TestError, metadata: Metadata) -> Self {
        let status = if error.is_assertion() {
            TestStatus::Failure
        } else {
            TestStatus::Error
        };
        Self {
            status,
            cause: Some(error),
            metadata: Some(metadata),
        }
    }

    pub fn timed_out(timeout: Duration, metadata: Metadata) -> Self {
        Self {
            status: TestStatus::Error,
            cause: Some(TestError::Timeout { timeout }),
            metadata: Some(metadata),
        }
    }

    /// Result for an inactive test: no cause, no metadata.
    pub fn ignored() -> Self {
        Self {
            status: TestStatus::Ignored,
            cause: None,
            metadata: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Success
    }

    /// One-line human readable summary for reporting
    pub fn summary(&self) -> String {
        match &self.cause {
            Some(cause) => format!("{}: {}", self.status, cause),
            None => self.status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn test_assertion_kinds_classify_as_failure() {
        let result = TestResult::from_error(TestError::assertion("1 != 2"), Metadata::default());
        assert_eq!(result.status, TestStatus::Failure);

        let result = TestResult::from_error(
            TestError::Panicked("assertion failed: x > 0".to_string()),
            Metadata::default(),
        );
        assert_eq!(result.status, TestStatus::Failure);
    }

    #[test]
    fn test_non_assertion_panics_classify_as_error() {
        let payload = std::panic::catch_unwind(|| {
            let missing: Option<u8> = None;
            missing.unwrap()
        })
        .unwrap_err();
        let error = TestError::from_panic(payload);
        assert!(!error.is_assertion());
        assert_eq!(
            TestResult::from_error(error, Metadata::default()).status,
            TestStatus::Error
        );

        let payload = std::panic::catch_unwind(|| assert_eq!(1 + 1, 3)).unwrap_err();
        assert!(TestError::from_panic(payload).is_assertion());
    }

    #[test]
    fn test_other_errors_classify_as_error() {
        let result = TestResult::from_error(TestError::other(Refused), Metadata::default());
        assert_eq!(result.status, TestStatus::Error);
        assert_eq!(result.summary(), "error: connection refused");
    }

    #[test]
    fn test_timeout_message_carries_duration_and_unit() {
        let error = TestError::Timeout {
            timeout: Duration::from_secs(1),
        };
        assert_eq!(error.to_string(), "test timed out after 1 SECONDS");
        assert!(!error.is_assertion());

        let error = TestError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert_eq!(error.to_string(), "test timed out after 250 MILLISECONDS");
    }

    #[test]
    fn test_status_serializes_by_name() {
        assert_eq!(serde_json::to_string(&TestStatus::Failure).unwrap(), "\"Failure\"");
        assert_eq!(TestStatus::Ignored.to_string(), "ignored");
    }

    #[test]
    fn test_ignored_has_no_cause_or_metadata() {
        let result = TestResult::ignored();
        assert_eq!(result.status, TestStatus::Ignored);
        assert!(result.cause.is_none());
        assert!(result.metadata.is_none());
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");

        let payload: Box<dyn Any + Send> = Box::new(7_u32);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
