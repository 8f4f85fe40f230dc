//! Symbolic engine capability.

use serde::{Deserialize, Serialize};
use symtest_core::{CoreError, CoreResult, Value};

/// Calibration markers bracketing known-cost regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationOp {
    /// Calibration begins
    Start,
    /// A region of the given ordinal cost ends here
    Checkpoint(u32),
    /// Calibration ends
    End,
}

/// Operations the harness consumes from a symbolic execution engine.
///
/// Acquisitions are the points where the engine may fork; from the
/// harness's side each call returns exactly one value.
pub trait SymbexEngine {
    /// Open an exploration session; `max_time_secs == 0` means unbounded
    ///
    /// # Errors
    ///
    /// Returns `EngineUnavailable` if the engine cannot attach
    fn begin_session(&mut self, max_time_secs: u32) -> CoreResult<()>;

    /// Close the session opened by [`SymbexEngine::begin_session`]
    fn end_session(&mut self, keep_exploring: bool);

    /// Deliberately end the current path
    fn terminate_path(&mut self, code: i32, reason: &str);

    /// Symbolic integer seeded with `default`
    fn symbolic_int(&mut self, default: i32, name: &str, max: Option<i32>, min: Option<i32>) -> i32;

    /// Symbolic byte string seeded with `default`
    fn symbolic_sequence(
        &mut self,
        default: &[u8],
        name: &str,
        max_size: Option<usize>,
        min_size: Option<usize>,
    ) -> Vec<u8>;

    /// Add a path constraint
    fn assume(&mut self, condition: bool);

    /// Constrain every byte of `value` to ASCII
    fn assume_ascii(&mut self, value: &[u8]);

    /// Pick one concrete value consistent with the current path
    fn concretize(&mut self, value: Value) -> Value;

    /// Append a line to the recorded output of the current path
    fn record_log(&mut self, message: &str);

    /// Timing calibration marker
    fn calibrate(&mut self, op: CalibrationOp);
}

/// Engine used when no symbolic engine is attached.
///
/// Sessions never start, acquisitions return their defaults and every
/// other call is only recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcreteEngine {
    /// Session start attempts
    pub session_attempts: usize,
    /// Code and reason of the last path termination
    pub terminated: Option<(i32, String)>,
    /// `keep_exploring` flag of the last session end
    pub ended: Option<bool>,
    /// Recorded log lines
    pub log: Vec<String>,
    /// Calibration markers seen
    pub calibration: Vec<CalibrationOp>,
}

impl ConcreteEngine {
    /// Create a new concrete engine
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbexEngine for ConcreteEngine {
    fn begin_session(&mut self, _max_time_secs: u32) -> CoreResult<()> {
        self.session_attempts += 1;
        Err(CoreError::EngineUnavailable {
            reason: "no symbolic engine attached".to_string(),
        })
    }

    fn end_session(&mut self, keep_exploring: bool) {
        self.ended = Some(keep_exploring);
    }

    fn terminate_path(&mut self, code: i32, reason: &str) {
        tracing::debug!(code, reason, "Path terminated");
        self.terminated = Some((code, reason.to_string()));
    }

    fn symbolic_int(&mut self, default: i32, _name: &str, _max: Option<i32>, _min: Option<i32>) -> i32 {
        default
    }

    fn symbolic_sequence(
        &mut self,
        default: &[u8],
        _name: &str,
        _max_size: Option<usize>,
        _min_size: Option<usize>,
    ) -> Vec<u8> {
        default.to_vec()
    }

    fn assume(&mut self, _condition: bool) {}

    fn assume_ascii(&mut self, _value: &[u8]) {}

    fn concretize(&mut self, value: Value) -> Value {
        value
    }

    fn record_log(&mut self, message: &str) {
        self.log.push(message.to_string());
    }

    fn calibrate(&mut self, op: CalibrationOp) {
        self.calibration.push(op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concrete_engine_refuses_sessions() {
        let mut engine = ConcreteEngine::new();
        let err = engine.begin_session(0).unwrap_err();
        assert_eq!(err.kind_name(), "EngineUnavailable");
        assert_eq!(engine.session_attempts, 1);
    }

    #[test]
    fn test_concrete_engine_returns_defaults() {
        let mut engine = ConcreteEngine::new();
        assert_eq!(engine.symbolic_int(7, "x", Some(10), Some(0)), 7);
        assert_eq!(engine.symbolic_sequence(b"abc", "s", None, None), b"abc".to_vec());
        assert_eq!(engine.concretize(Value::Int(3)), Value::Int(3));
    }

    #[test]
    fn test_concrete_engine_records() {
        let mut engine = ConcreteEngine::new();
        engine.record_log("hello");
        engine.calibrate(CalibrationOp::Checkpoint(5));
        engine.terminate_path(0, "done");
        assert_eq!(engine.log, vec!["hello".to_string()]);
        assert_eq!(engine.calibration, vec![CalibrationOp::Checkpoint(5)]);
        assert_eq!(engine.terminated, Some((0, "done".to_string())));
    }
}
