//! Coverage reconciliation.
//!
//! Turns the measurement tool's textual summary into per-file statement
//! sets by asking the tool for a detailed analysis of every listed file.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use symtest_core::CoreResult;
use symtest_runtime::{CoverageCollector, FileAnalysis};

/// Name of the aggregate summary row
pub const TOTAL_ROW: &str = "TOTAL";

/// `<file> <statements> <missed> <pct>%`
const SUMMARY_LINE_PATTERN: &str = r"^(.*\S)\s+(\d+)\s+(\d+)\s+(\d+)%\s*$";

fn summary_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SUMMARY_LINE_PATTERN).expect("summary line pattern is valid"))
}

/// Coverage reconciliation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Extension appended to summary filenames for detailed analysis;
    /// empty means use the name as listed
    pub source_extension: String,
}

impl CoverageConfig {
    /// Create a config for the given extension
    #[must_use]
    pub fn new(source_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
        }
    }

    /// Analysis key of a summary filename
    #[must_use]
    pub fn analysis_key(&self, filename: &str) -> String {
        if self.source_extension.is_empty() {
            filename.to_string()
        } else {
            format!("{}.{}", filename, self.source_extension)
        }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self::new("py")
    }
}

/// One parsed summary row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    /// Statement count
    pub statements: u32,
    /// Statements never executed
    pub missed: u32,
    /// Coverage percentage
    pub percent: u32,
}

/// Parse a textual coverage summary.
///
/// Headers, separators and the `TOTAL` row are skipped.
#[must_use]
pub fn parse_summary(text: &str) -> IndexMap<String, SummaryLine> {
    let re = summary_line_re();
    let mut rows = IndexMap::new();

    for line in text.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let filename = caps[1].trim();
        // A real file named TOTAL is indistinguishable from the aggregate row
        if filename == TOTAL_ROW {
            continue;
        }

        let (Ok(statements), Ok(missed), Ok(percent)) =
            (caps[2].parse::<u32>(), caps[3].parse::<u32>(), caps[4].parse::<u32>())
        else {
            continue;
        };

        rows.insert(
            filename.to_string(),
            SummaryLine {
                statements,
                missed,
                percent,
            },
        );
    }

    rows
}

/// Per-file statement sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoverageReport {
    files: BTreeMap<String, FileAnalysis>,
}

impl CoverageReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file entry
    pub fn insert(&mut self, filename: impl Into<String>, analysis: FileAnalysis) {
        self.files.insert(filename.into(), analysis);
    }

    /// Analysis of one file
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&FileAnalysis> {
        self.files.get(filename)
    }

    /// Number of files covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check for an empty report
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over files in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileAnalysis)> {
        self.files.iter()
    }
}

/// Build a coverage report from a stopped collector
///
/// # Errors
///
/// Returns the collector's error if the summary cannot be produced
pub fn reconcile(
    collector: &mut dyn CoverageCollector,
    config: &CoverageConfig,
) -> CoreResult<CoverageReport> {
    let summary = collector.summary_text()?;
    let mut report = CoverageReport::new();

    for filename in parse_summary(&summary).into_keys() {
        tracing::debug!("  Processing coverage for '{}'", filename);
        let key = config.analysis_key(&filename);
        match collector.detailed_analysis(&key) {
            Ok(analysis) => report.insert(filename, analysis),
            Err(err) => tracing::warn!("No detailed coverage for '{}': {}", key, err),
        }
    }

    Ok(report)
}
