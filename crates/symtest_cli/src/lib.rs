//! Operator entry points for symtest harnesses
//!
//! A harness binary wraps one test definition and calls
//! [`run_from_args`]; the `symtest` binary inspects recorded test cases.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod inspect;
pub mod run;

pub use args::{RunArgs, RunMode};
pub use inspect::{encode_name_command, inspect_file};
pub use run::{print_report, run_from_args, Outcome};

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. A subscriber that is already
/// installed is kept.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
