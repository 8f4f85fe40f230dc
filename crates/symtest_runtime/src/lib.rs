//! symtest Runtime
//!
//! One test body, two execution modes. Under Symbolic mode every input
//! acquisition is delegated to an external symbolic engine; under Replay
//! mode inputs come from a concrete assignment and the emitted log is
//! kept for later comparison.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calibrate;
pub mod context;
pub mod controller;
pub mod engine;
pub mod failure;
pub mod measure;
pub mod request;

pub use calibrate::perform_calibration;
pub use context::{AssignmentSource, EngineSource, InputSource, Mode, SymbolicTest, TestContext, TEST_LOG_TARGET};
pub use controller::{run_replay, run_symbolic, ReplayRun, SymbolicConfig, FATAL_EXIT_CODE};
pub use engine::{CalibrationOp, ConcreteEngine, SymbexEngine};
pub use failure::{classify, TestFailure};
pub use measure::{CoverageCollector, CoverageGuard, FileAnalysis};
pub use request::{IntRequest, SequenceRequest};
