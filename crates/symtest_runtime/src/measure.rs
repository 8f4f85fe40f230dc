//! Statement-coverage measurement capability.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use symtest_core::CoreResult;

/// Line classification of one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Lines holding executable statements
    pub executable: BTreeSet<u32>,
    /// Lines excluded from measurement
    pub excluded: BTreeSet<u32>,
    /// Executable lines never reached
    pub missing: BTreeSet<u32>,
}

/// Operations consumed from a coverage-measurement tool.
///
/// The tool is a process-wide resource; one measurement session per
/// replay batch.
pub trait CoverageCollector {
    /// Begin measuring
    fn start(&mut self);

    /// Stop measuring
    fn stop(&mut self);

    /// Discard collected data
    fn erase(&mut self);

    /// Textual per-file summary, one `<file> <stmts> <miss> <pct>%` row per file
    ///
    /// # Errors
    ///
    /// Tool specific
    fn summary_text(&mut self) -> CoreResult<String>;

    /// Detailed line classification for one file
    ///
    /// # Errors
    ///
    /// Tool specific, typically when the file is unknown
    fn detailed_analysis(&mut self, filename: &str) -> CoreResult<FileAnalysis>;
}

/// Scoped measurement: started on creation, stopped on drop at the latest
pub struct CoverageGuard<'c> {
    collector: &'c mut dyn CoverageCollector,
    running: bool,
}

impl<'c> CoverageGuard<'c> {
    /// Start measuring
    pub fn start(collector: &'c mut dyn CoverageCollector) -> Self {
        tracing::debug!("Coverage measurement started");
        collector.start();
        Self {
            collector,
            running: true,
        }
    }

    /// Check whether measurement is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop measuring; idempotent
    pub fn stop(&mut self) {
        if self.running {
            self.collector.stop();
            self.running = false;
            tracing::debug!("Coverage measurement stopped");
        }
    }

    /// The guarded collector, for reporting after [`CoverageGuard::stop`]
    pub fn collector(&mut self) -> &mut dyn CoverageCollector {
        &mut *self.collector
    }
}

impl Drop for CoverageGuard<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}
