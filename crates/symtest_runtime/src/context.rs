//! The dual-mode test contract.
//!
//! A test body talks only to a [`TestContext`]. The context forwards to
//! one of two [`InputSource`] strategies chosen at construction:
//! [`EngineSource`] for Symbolic mode, [`AssignmentSource`] for Replay.

use crate::engine::SymbexEngine;
use crate::request::{IntRequest, SequenceRequest};
use serde::{Deserialize, Serialize};
use symtest_core::{Assignment, CoreResult, Value};

/// Side-channel target for test log lines
pub const TEST_LOG_TARGET: &str = "symtest::test_log";

/// Execution mode of a test instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Inputs come from the symbolic engine
    Symbolic,
    /// Inputs come from a concrete assignment
    Replay,
}

/// A symbolic test.
///
/// The same implementation runs unmodified under exploration and replay.
pub trait SymbolicTest {
    /// Called exactly once before [`SymbolicTest::execute`]
    ///
    /// # Errors
    ///
    /// Any error is treated like a failure of the test body
    fn prepare(&mut self, _ctx: &mut TestContext<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The test body
    ///
    /// # Errors
    ///
    /// Any error kind may escape
    fn execute(&mut self, ctx: &mut TestContext<'_>) -> anyhow::Result<()>;
}

/// Where a test instance gets its input values from
pub trait InputSource {
    /// Mode this source implements
    fn mode(&self) -> Mode;

    /// Resolve a validated integer request
    ///
    /// # Errors
    ///
    /// Returns `Decoding` if a replayed value is not an integer
    fn integer(&mut self, request: &IntRequest) -> CoreResult<i32>;

    /// Resolve a validated sequence request
    ///
    /// # Errors
    ///
    /// Implementation specific
    fn sequence(&mut self, request: &SequenceRequest) -> CoreResult<Vec<u8>>;

    /// Path constraint
    fn assume(&mut self, condition: bool);

    /// Record one log line
    fn log(&mut self, message: &str);

    /// Concrete value for a possibly symbolic one
    fn concretize(&mut self, value: Value) -> Value;
}

/// Symbolic-mode source backed by an engine
pub struct EngineSource<'e> {
    engine: &'e mut dyn SymbexEngine,
}

impl<'e> EngineSource<'e> {
    /// Wrap an engine
    pub fn new(engine: &'e mut dyn SymbexEngine) -> Self {
        Self { engine }
    }
}

impl InputSource for EngineSource<'_> {
    fn mode(&self) -> Mode {
        Mode::Symbolic
    }

    fn integer(&mut self, request: &IntRequest) -> CoreResult<i32> {
        Ok(self.engine.symbolic_int(
            request.default,
            &request.name,
            request.max_value,
            request.min_value,
        ))
    }

    fn sequence(&mut self, request: &SequenceRequest) -> CoreResult<Vec<u8>> {
        let default = request.default_bytes()?;
        let value =
            self.engine
                .symbolic_sequence(default, &request.name, request.max_size, request.min_size);
        if request.ascii_only {
            self.engine.assume_ascii(&value);
        }
        Ok(value)
    }

    fn assume(&mut self, condition: bool) {
        self.engine.assume(condition);
    }

    fn log(&mut self, message: &str) {
        self.engine.record_log(message);
    }

    fn concretize(&mut self, value: Value) -> Value {
        self.engine.concretize(value)
    }
}

/// Replay-mode source backed by a concrete assignment
#[derive(Debug, Clone, Default)]
pub struct AssignmentSource {
    assignment: Assignment,
    log: Vec<String>,
}

impl AssignmentSource {
    /// Create a source over an assignment
    #[must_use]
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignment,
            log: Vec::new(),
        }
    }

    /// The assignment being replayed
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// Log lines accumulated so far
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Consume into `(assignment, log)`
    #[must_use]
    pub fn into_parts(self) -> (Assignment, Vec<String>) {
        (self.assignment, self.log)
    }

    fn lookup(&self, name: &str, default: &dyn std::fmt::Display) -> Option<&Value> {
        let value = self.assignment.get(name);
        if value.is_none() {
            tracing::info!(
                "Key '{}' not found in assignment. Using default '{}'.",
                name,
                default
            );
        }
        value
    }
}

impl InputSource for AssignmentSource {
    fn mode(&self) -> Mode {
        Mode::Replay
    }

    fn integer(&mut self, request: &IntRequest) -> CoreResult<i32> {
        match self.lookup(&request.name, &request.default) {
            Some(value) => value.to_int(),
            None => Ok(request.default),
        }
    }

    fn sequence(&mut self, request: &SequenceRequest) -> CoreResult<Vec<u8>> {
        match self.lookup(&request.name, &request.default) {
            Some(value) => Ok(value.clone().into_bytes()),
            None => Ok(request.default_bytes()?.to_vec()),
        }
    }

    fn assume(&mut self, _condition: bool) {}

    fn log(&mut self, message: &str) {
        self.log.push(message.to_string());
    }

    fn concretize(&mut self, value: Value) -> Value {
        value
    }
}

/// Handle a test body uses to acquire inputs and emit output
pub struct TestContext<'a> {
    source: &'a mut dyn InputSource,
}

impl<'a> TestContext<'a> {
    /// Create a context over a source
    pub fn new(source: &'a mut dyn InputSource) -> Self {
        Self { source }
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.source.mode()
    }

    /// Check for Replay mode
    #[must_use]
    pub fn is_replay(&self) -> bool {
        self.mode() == Mode::Replay
    }

    /// Acquire an unbounded integer
    ///
    /// # Errors
    ///
    /// Returns `Decoding` if a replayed value is not an integer
    pub fn acquire_integer(&mut self, name: &str, default: i32) -> CoreResult<i32> {
        self.acquire_int(IntRequest::new(name, default))
    }

    /// Acquire an integer with optional inclusive bounds
    ///
    /// # Errors
    ///
    /// Returns `Configuration` on inverted bounds, `Decoding` on a
    /// non-integer replayed value
    pub fn acquire_integer_bounded(
        &mut self,
        name: &str,
        default: i32,
        min: Option<i32>,
        max: Option<i32>,
    ) -> CoreResult<i32> {
        self.acquire_int(IntRequest {
            name: name.to_string(),
            default,
            min_value: min,
            max_value: max,
        })
    }

    /// Acquire an integer from a full request
    ///
    /// # Errors
    ///
    /// See [`TestContext::acquire_integer_bounded`]
    pub fn acquire_int(&mut self, request: IntRequest) -> CoreResult<i32> {
        request.validate()?;
        self.source.integer(&request)
    }

    /// Acquire an unbounded byte string.
    ///
    /// `default` must be a byte string; an integer default is rejected
    /// before the engine is involved.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` on a non-string default
    pub fn acquire_sequence(&mut self, name: &str, default: impl Into<Value>) -> CoreResult<Vec<u8>> {
        self.acquire_seq(SequenceRequest::new(name, default))
    }

    /// Acquire a byte string from a full request
    ///
    /// # Errors
    ///
    /// Returns `Configuration` on a non-string default or inverted sizes
    pub fn acquire_seq(&mut self, request: SequenceRequest) -> CoreResult<Vec<u8>> {
        request.validate()?;
        self.source.sequence(&request)
    }

    /// Add a path constraint; a no-op under replay
    pub fn assume(&mut self, condition: bool) {
        self.source.assume(condition);
    }

    /// Emit one log line
    pub fn emit_log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: TEST_LOG_TARGET, "*log* {}", message);
        self.source.log(message);
    }

    /// Concrete value for a possibly symbolic one; identity under replay
    pub fn concretize(&mut self, value: impl Into<Value>) -> Value {
        self.source.concretize(value.into())
    }
}
