//! Execution mode controller.
//!
//! Drives one test instance through `prepare` then `execute`, either
//! against a symbolic engine or against a concrete assignment.

use crate::context::{AssignmentSource, EngineSource, SymbolicTest, TestContext};
use crate::engine::SymbexEngine;
use crate::failure::TestFailure;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use symtest_core::{Assignment, CoreResult};

/// Path termination code after a failed symbolic run
pub const FATAL_EXIT_CODE: i32 = 1;

/// Symbolic-mode configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolicConfig {
    /// Exploration budget in seconds, 0 = unlimited
    pub max_time_secs: u32,
}

impl SymbolicConfig {
    /// Create an unlimited config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exploration budget
    #[must_use]
    pub fn with_max_time(mut self, secs: u32) -> Self {
        self.max_time_secs = secs;
        self
    }
}

/// Outcome of one replay run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayRun {
    /// Assignment that was replayed
    pub assignment: Assignment,
    /// Log lines emitted, in order
    pub log: Vec<String>,
    /// Failure, if the test did not complete
    pub failure: Option<TestFailure>,
}

impl ReplayRun {
    /// Check for a clean completion
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// The emitted log joined into one string, as recorded by the engine
    #[must_use]
    pub fn log_roll(&self) -> String {
        self.log.concat()
    }
}

/// Run a phase of the test, catching both errors and panics
fn guarded<F>(phase: F) -> Result<(), TestFailure>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(phase)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(TestFailure::from_error(&err)),
        Err(payload) => Err(TestFailure::from_panic(payload.as_ref())),
    }
}

/// Run a test in Symbolic mode.
///
/// A session the engine refuses is not fatal: the test still runs and
/// acquisitions fall back to whatever the engine returns outside a
/// session. A failure of the test body is fatal to the path.
///
/// # Errors
///
/// Returns `TestBody` when the test body failed; the path has already
/// been terminated with [`FATAL_EXIT_CODE`]
pub fn run_symbolic<T, F>(
    factory: F,
    engine: &mut dyn SymbexEngine,
    config: &SymbolicConfig,
) -> CoreResult<()>
where
    T: SymbolicTest,
    F: FnOnce() -> T,
{
    let mut test = factory();

    let prepared = guarded(|| {
        let mut source = EngineSource::new(&mut *engine);
        test.prepare(&mut TestContext::new(&mut source))
    });

    let mut session = false;
    let result = prepared.and_then(|()| {
        match engine.begin_session(config.max_time_secs) {
            Ok(()) => session = true,
            Err(err) => tracing::warn!(
                "Cannot start the exploration session ({}). Proceeding without engine support.",
                err
            ),
        }

        guarded(|| {
            let mut source = EngineSource::new(&mut *engine);
            test.execute(&mut TestContext::new(&mut source))
        })
    });

    match result {
        Ok(()) => {
            if session {
                engine.end_session(false);
            } else {
                engine.terminate_path(0, "Symbolic test ended");
            }
            Ok(())
        }
        Err(failure) => {
            tracing::error!(kind = %failure.kind, "Symbolic test failed:\n{}", failure.trace);
            engine.terminate_path(FATAL_EXIT_CODE, &format!("Symbolic test failed: {}", failure));
            Err(failure.into())
        }
    }
}

/// Run a test in Replay mode against a concrete assignment.
///
/// Never fails: the outcome carries the classified failure and the log
/// emitted up to that point.
pub fn run_replay<T, F>(factory: F, assignment: Assignment) -> ReplayRun
where
    T: SymbolicTest,
    F: FnOnce() -> T,
{
    tracing::info!("Replaying {}", assignment);

    let mut source = AssignmentSource::new(assignment);
    let outcome = guarded(|| {
        let mut test = factory();
        let mut ctx = TestContext::new(&mut source);
        test.prepare(&mut ctx)?;
        test.execute(&mut ctx)
    });

    let failure = outcome.err();
    if let Some(failure) = &failure {
        tracing::error!(kind = %failure.kind, "Error detected:\n{}", failure.trace);
    }

    let (assignment, log) = source.into_parts();
    ReplayRun {
        assignment,
        log,
        failure,
    }
}
