//! symtest Core Types
//!
//! Pure types and logic with no I/O: typed symbolic values, concrete
//! assignments, the assignment-name codec and the shared error kinds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assignment;
pub mod codec;
pub mod error;
pub mod escape;
pub mod value;

// Re-exports
pub use assignment::Assignment;
pub use codec::{decode_entry, decode_name, decode_value, encode_name, encode_value, AssignmentName};
pub use error::{CoreError, CoreResult};
pub use escape::unescape;
pub use value::{Kind, Value};
