//! Harness configuration.

use crate::coverage::CoverageConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use symtest_core::CoreResult;
use symtest_runtime::SymbolicConfig;

/// Replay batch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Compare replayed logs against recorded output
    pub compare_output: bool,
    /// Measure coverage when a collector is attached
    pub measure_coverage: bool,
}

impl ReplayConfig {
    /// Create the default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable output comparison
    #[must_use]
    pub fn with_compare_output(mut self, compare: bool) -> Self {
        self.compare_output = compare;
        self
    }

    /// Enable or disable coverage measurement
    #[must_use]
    pub fn with_coverage(mut self, measure: bool) -> Self {
        self.measure_coverage = measure;
        self
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            compare_output: true,
            measure_coverage: true,
        }
    }
}

/// All harness settings, loadable from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Symbolic-mode settings
    pub symbolic: SymbolicConfig,
    /// Replay settings
    pub replay: ReplayConfig,
    /// Coverage settings
    pub coverage: CoverageConfig,
}

impl HarnessConfig {
    /// Parse from a JSON string; missing sections take their defaults
    ///
    /// # Errors
    ///
    /// Returns `Configuration` on malformed JSON
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Configuration` if it
    /// does not parse
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }
}
