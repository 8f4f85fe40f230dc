//! Classification of errors escaping a test body.

use serde::{Deserialize, Serialize};
use std::any::Any;
use symtest_core::CoreError;

/// A classified failure of one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFailure {
    /// Error kind (`DecodingError`, `IoError`, `TestBodyError`, `Panic`, ...)
    pub kind: String,
    /// One-line message
    pub message: String,
    /// Full trace: error chain, and backtrace when captured
    pub trace: String,
}

impl TestFailure {
    /// Classify an error returned by a test body
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        Self {
            kind: classify(err),
            message: err.to_string(),
            trace: format!("{:?}", err),
        }
    }

    /// Classify a panic payload caught around a test body
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };

        Self {
            kind: "Panic".to_string(),
            trace: format!("panicked: {}", message),
            message,
        }
    }
}

impl From<TestFailure> for CoreError {
    fn from(failure: TestFailure) -> Self {
        CoreError::TestBody {
            kind: failure.kind,
            message: failure.message,
        }
    }
}

impl std::fmt::Display for TestFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Kind name of an error escaping a test body
#[must_use]
pub fn classify(err: &anyhow::Error) -> String {
    if let Some(core) = err.downcast_ref::<CoreError>() {
        return core.kind_name().to_string();
    }
    if err.downcast_ref::<std::io::Error>().is_some() {
        return "IoError".to_string();
    }
    "TestBodyError".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_classify_core_error() {
        let err = anyhow::Error::new(CoreError::decoding("bad"));
        assert_eq!(classify(&err), "DecodingError");
    }

    #[test]
    fn test_classify_io_error() {
        let err = anyhow::Error::new(std::io::Error::other("disk"));
        assert_eq!(classify(&err), "IoError");
    }

    #[test]
    fn test_classify_context_keeps_root_kind() {
        let err = Err::<(), _>(CoreError::configuration("bad default"))
            .context("while preparing")
            .unwrap_err();
        assert_eq!(classify(&err), "ConfigurationError");
    }

    #[test]
    fn test_classify_other_error() {
        let err = anyhow!("assertion failed");
        let failure = TestFailure::from_error(&err);
        assert_eq!(failure.kind, "TestBodyError");
        assert_eq!(failure.message, "assertion failed");
        assert!(failure.trace.contains("assertion failed"));
    }

    #[test]
    fn test_from_panic_payloads() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(TestFailure::from_panic(payload.as_ref()).message, "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let failure = TestFailure::from_panic(payload.as_ref());
        assert_eq!(failure.kind, "Panic");
        assert_eq!(failure.message, "bang");
    }

    #[test]
    fn test_into_core_error() {
        let failure = TestFailure::from_error(&anyhow!("x"));
        let err: CoreError = failure.into();
        assert_eq!(err.kind_name(), "TestBodyError");
    }
}
