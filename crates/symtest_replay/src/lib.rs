//! symtest Replay Engine
//!
//! Concrete re-execution of recorded test cases, output reconciliation
//! and statement-coverage reporting.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod coverage;
pub mod diff;
pub mod engine;

pub use config::{HarnessConfig, ReplayConfig};
pub use coverage::{parse_summary, reconcile, CoverageConfig, CoverageReport, SummaryLine};
pub use diff::{LineChange, OutputMismatch};
pub use engine::{ReplayFailure, ReplayReport, Replayer};
