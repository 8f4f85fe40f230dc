//! Test-case record payloads.
//!
//! Each record payload is a protobuf `TestCase` message:
//!
//! ```text
//! message VarAssignment { string name = 1; bytes value = 2; }
//! message Input { repeated VarAssignment var_assignment = 1; }
//! message TestCase {
//!   uint64 time_stamp = 1;
//!   Input input = 2;
//!   string output = 3;
//!   uint64 high_level_path_id = 4;
//! }
//! ```

use prost::Message;
use serde::Serialize;
use symtest_core::{codec, Assignment, CoreError, CoreResult};

/// One raw variable assignment
#[derive(Clone, PartialEq, Message)]
pub struct VarAssignment {
    /// Encoded assignment name (`base.kind#hint`)
    #[prost(string, tag = "1")]
    pub name: String,
    /// Raw value bytes
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Input section of a test case
#[derive(Clone, PartialEq, Message)]
pub struct InputMessage {
    /// Raw assignments
    #[prost(message, repeated, tag = "1")]
    pub var_assignment: Vec<VarAssignment>,
}

/// Wire form of a test case
#[derive(Clone, PartialEq, Message)]
pub struct TestCaseMessage {
    /// Engine-assigned time stamp
    #[prost(uint64, tag = "1")]
    pub time_stamp: u64,
    /// Discovered input
    #[prost(message, optional, tag = "2")]
    pub input: Option<InputMessage>,
    /// Log output recorded along the path
    #[prost(string, tag = "3")]
    pub output: String,
    /// Opaque path identifier
    #[prost(uint64, tag = "4")]
    pub high_level_path_id: u64,
}

/// A decoded test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Engine-assigned time stamp
    pub time_stamp: u64,
    /// Typed assignment
    pub assignment: Assignment,
    /// Concatenated log of the exploration run that found this case
    pub output: String,
    /// Opaque path identifier
    pub high_level_path_id: u64,
}

impl TestCase {
    /// Create a test case
    #[must_use]
    pub fn new(assignment: Assignment, output: impl Into<String>) -> Self {
        Self {
            time_stamp: 0,
            assignment,
            output: output.into(),
            high_level_path_id: 0,
        }
    }

    /// Set the time stamp
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: u64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    /// Set the path identifier
    #[must_use]
    pub fn with_path_id(mut self, path_id: u64) -> Self {
        self.high_level_path_id = path_id;
        self
    }

    /// Decode from a wire message
    ///
    /// # Errors
    ///
    /// Returns `Decoding` on a malformed assignment entry
    pub fn from_message(message: TestCaseMessage) -> CoreResult<Self> {
        let input = message.input.unwrap_or_default();
        let assignment = Assignment::from_raw_entries(
            input
                .var_assignment
                .iter()
                .map(|a| (a.name.as_str(), a.value.as_slice())),
        )?;

        Ok(Self {
            time_stamp: message.time_stamp,
            assignment,
            output: message.output,
            high_level_path_id: message.high_level_path_id,
        })
    }

    /// Convert to the wire message; names carry an explicit kind
    #[must_use]
    pub fn to_message(&self) -> TestCaseMessage {
        let var_assignment = self
            .assignment
            .iter()
            .map(|(base, value)| VarAssignment {
                name: codec::encode_name(base, Some(value.kind()), None),
                value: codec::encode_value(value),
            })
            .collect();

        TestCaseMessage {
            time_stamp: self.time_stamp,
            input: Some(InputMessage { var_assignment }),
            output: self.output.clone(),
            high_level_path_id: self.high_level_path_id,
        }
    }

    /// Encode to record payload bytes
    #[must_use]
    pub fn encode_record(&self) -> Vec<u8> {
        self.to_message().encode_to_vec()
    }
}

/// Decode one record payload
///
/// # Errors
///
/// Returns `Decoding` if the payload is not a valid test case
pub fn decode_record(bytes: &[u8]) -> CoreResult<TestCase> {
    let message = TestCaseMessage::decode(bytes)
        .map_err(|e| CoreError::decoding(format!("malformed test case record: {}", e)))?;
    TestCase::from_message(message)
}
