//! symtest Test-Case Log
//!
//! Test-case files are written by the symbolic engine as a sequence of
//! `[u32 little-endian length][payload]` records. A truncated tail is a
//! clean end of file, never an error.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod framing;
pub mod record;
pub mod stream;

pub use framing::{FrameReader, FrameWriter, HEADER_LEN};
pub use record::{decode_record, InputMessage, TestCase, TestCaseMessage, VarAssignment};
pub use stream::{read_all, TestCaseReader, TestCaseWriter};
