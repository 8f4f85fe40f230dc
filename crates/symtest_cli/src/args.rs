//! Harness command line.

use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

/// Command line of a harness binary
#[derive(Debug, Clone, Default, Parser)]
#[command(about = "Explore a symbolic test, or replay it against concrete inputs", long_about = None)]
#[command(group(ArgGroup::new("replay").args(["assign", "replay_default", "file"])))]
pub struct RunArgs {
    /// Replay with NAME set to the escaped VALUE; repeatable
    #[arg(
        short = 'a',
        long = "assign",
        num_args = 2,
        value_names = ["NAME", "VALUE"],
        allow_hyphen_values = true,
        action = ArgAction::Append
    )]
    pub assign: Vec<String>,

    /// Replay once with every input at its default
    #[arg(short = 'r', long = "replay")]
    pub replay_default: bool,

    /// Replay every test case recorded in FILE
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Harness configuration (JSON)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What a harness invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Explore under the symbolic engine
    Symbolic,
    /// Replay one explicit assignment of `(name, escaped value)` pairs
    Assignment(Vec<(String, String)>),
    /// Replay one run with defaults
    Defaults,
    /// Replay a Test-Case file
    File(PathBuf),
}

impl RunArgs {
    /// Resolve the requested mode
    #[must_use]
    pub fn mode(&self) -> RunMode {
        if !self.assign.is_empty() {
            let pairs = self
                .assign
                .chunks(2)
                .filter_map(|pair| match pair {
                    [name, value] => Some((name.clone(), value.clone())),
                    _ => None,
                })
                .collect();
            RunMode::Assignment(pairs)
        } else if self.replay_default {
            RunMode::Defaults
        } else if let Some(path) = &self.file {
            RunMode::File(path.clone())
        } else {
            RunMode::Symbolic
        }
    }
}
