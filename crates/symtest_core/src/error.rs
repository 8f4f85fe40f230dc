//! Core error types for symtest.

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
///
/// Every failure the harness can raise belongs to one of these kinds.
/// Mismatched replay output is not an error and has no variant here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Bad default or type at test-definition time
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What was wrong with the definition
        reason: String,
    },

    /// Malformed assignment name, value bytes or record payload
    #[error("Decoding error: {reason}")]
    Decoding {
        /// What could not be decoded
        reason: String,
    },

    /// The symbolic engine refused to start a session
    #[error("Engine unavailable: {reason}")]
    EngineUnavailable {
        /// Engine-supplied reason
        reason: String,
    },

    /// An error escaped the test body
    #[error("Test body failed ({kind}): {message}")]
    TestBody {
        /// Classified kind of the escaping error
        kind: String,
        /// Rendered error
        message: String,
    },

    /// Coverage reconciliation requested without measurement
    #[error("Coverage measurement was never enabled for this batch")]
    CoverageUnavailable,

    /// Stream failure other than a truncated tail
    #[error("I/O error: {message}")]
    Io {
        /// Rendered I/O error
        message: String,
    },
}

impl CoreError {
    /// Shorthand for a decoding error
    pub fn decoding(reason: impl Into<String>) -> Self {
        Self::Decoding {
            reason: reason.into(),
        }
    }

    /// Shorthand for a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Stable classification name used in replay reports
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "ConfigurationError",
            Self::Decoding { .. } => "DecodingError",
            Self::EngineUnavailable { .. } => "EngineUnavailable",
            Self::TestBody { .. } => "TestBodyError",
            Self::CoverageUnavailable => "CoverageUnavailableError",
            Self::Io { .. } => "IoError",
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration {
            reason: err.to_string(),
        }
    }
}
