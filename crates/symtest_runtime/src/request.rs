//! Symbolic value acquisition requests.

use symtest_core::{CoreError, CoreResult, Value};

/// Request for a named symbolic integer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntRequest {
    /// Variable name, unique per test run
    pub name: String,
    /// Replay fallback and exploration seed
    pub default: i32,
    /// Inclusive lower bound
    pub min_value: Option<i32>,
    /// Inclusive upper bound
    pub max_value: Option<i32>,
}

impl IntRequest {
    /// Create an unbounded request
    #[must_use]
    pub fn new(name: impl Into<String>, default: i32) -> Self {
        Self {
            name: name.into(),
            default,
            min_value: None,
            max_value: None,
        }
    }

    /// Set the lower bound
    #[must_use]
    pub fn with_min(mut self, min: i32) -> Self {
        self.min_value = Some(min);
        self
    }

    /// Set the upper bound
    #[must_use]
    pub fn with_max(mut self, max: i32) -> Self {
        self.max_value = Some(max);
        self
    }

    /// Check the request before any engine interaction
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the bounds are inverted
    pub fn validate(&self) -> CoreResult<()> {
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(CoreError::configuration(format!(
                    "'{}': min_value {} exceeds max_value {}",
                    self.name, min, max
                )));
            }
        }
        Ok(())
    }
}

/// Request for a named symbolic byte string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRequest {
    /// Variable name, unique per test run
    pub name: String,
    /// Replay fallback and exploration seed; must be a byte string
    pub default: Value,
    /// Minimum length
    pub min_size: Option<usize>,
    /// Maximum length
    pub max_size: Option<usize>,
    /// Constrain to ASCII after acquisition
    pub ascii_only: bool,
}

impl SequenceRequest {
    /// Create an unbounded request
    #[must_use]
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            min_size: None,
            max_size: None,
            ascii_only: false,
        }
    }

    /// Set the minimum length
    #[must_use]
    pub fn with_min_size(mut self, min: usize) -> Self {
        self.min_size = Some(min);
        self
    }

    /// Set the maximum length
    #[must_use]
    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Restrict to ASCII
    #[must_use]
    pub fn ascii(mut self) -> Self {
        self.ascii_only = true;
        self
    }

    /// Default bytes, once validated
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the default is not a byte string
    pub fn default_bytes(&self) -> CoreResult<&[u8]> {
        self.default.as_bytes().ok_or_else(|| {
            CoreError::configuration(format!(
                "'{}': default value must be a byte string, got {}",
                self.name, self.default
            ))
        })
    }

    /// Check the request before any engine interaction
    ///
    /// # Errors
    ///
    /// Returns `Configuration` on a non-string default or inverted sizes
    pub fn validate(&self) -> CoreResult<()> {
        self.default_bytes()?;
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(CoreError::configuration(format!(
                    "'{}': min_size {} exceeds max_size {}",
                    self.name, min, max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_request_bounds() {
        assert!(IntRequest::new("x", 0).with_min(-1).with_max(1).validate().is_ok());
        let err = IntRequest::new("x", 0).with_min(5).with_max(1).validate().unwrap_err();
        assert_eq!(err.kind_name(), "ConfigurationError");
    }

    #[test]
    fn test_sequence_request_default_must_be_bytes() {
        assert!(SequenceRequest::new("s", "abc").validate().is_ok());
        let err = SequenceRequest::new("s", 12i32).validate().unwrap_err();
        assert_eq!(err.kind_name(), "ConfigurationError");
    }

    #[test]
    fn test_sequence_request_sizes() {
        let req = SequenceRequest::new("s", "").with_min_size(4).with_max_size(2);
        assert!(req.validate().is_err());
        let req = SequenceRequest::new("s", "").with_min_size(2).with_max_size(4).ascii();
        assert!(req.validate().is_ok());
        assert!(req.ascii_only);
    }
}
