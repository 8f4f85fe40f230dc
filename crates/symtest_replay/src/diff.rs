//! Output reconciliation between a recorded and a replayed run.

use serde::{Deserialize, Serialize};

/// Line change in a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineChange {
    /// Line only in the replayed output
    Added(String),
    /// Line only in the recorded output
    Removed(String),
    /// Line differs
    Modified {
        /// Recorded line
        old: String,
        /// Replayed line
        new: String,
    },
    /// Line identical in both
    Unchanged(String),
}

/// A replay whose log differs from the recorded output.
///
/// Reported as a warning; never fails a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMismatch {
    /// Position of the test case within its batch
    pub index: usize,
    /// Path identifier of the recorded test case
    pub high_level_path_id: u64,
    /// Output recorded during exploration
    pub original: String,
    /// Log produced by the replay
    pub replayed: String,
    /// Line-by-line diff
    pub line_diff: Vec<LineChange>,
}

impl OutputMismatch {
    /// Compare outputs, returning a mismatch if they differ
    #[must_use]
    pub fn check(index: usize, high_level_path_id: u64, original: &str, replayed: &str) -> Option<Self> {
        if original == replayed {
            return None;
        }
        Some(Self {
            index,
            high_level_path_id,
            original: original.to_string(),
            replayed: replayed.to_string(),
            line_diff: diff_lines(original, replayed),
        })
    }

    /// Emit the mismatch as warnings
    pub fn warn(&self) {
        tracing::warn!("Mismatched test case output (case {}):", self.index);
        tracing::warn!("Original: {}", self.original);
        tracing::warn!("Replayed: {}", self.replayed);
    }

    /// Number of changed lines
    #[must_use]
    pub fn changed_lines(&self) -> usize {
        self.line_diff
            .iter()
            .filter(|c| !matches!(c, LineChange::Unchanged(_)))
            .count()
    }
}

/// Positional line diff
#[must_use]
pub fn diff_lines(old: &str, new: &str) -> Vec<LineChange> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let max_len = old_lines.len().max(new_lines.len());

    (0..max_len)
        .filter_map(|i| match (old_lines.get(i), new_lines.get(i)) {
            (Some(o), Some(n)) if o == n => Some(LineChange::Unchanged((*o).to_string())),
            (Some(o), Some(n)) => Some(LineChange::Modified {
                old: (*o).to_string(),
                new: (*n).to_string(),
            }),
            (Some(o), None) => Some(LineChange::Removed((*o).to_string())),
            (None, Some(n)) => Some(LineChange::Added((*n).to_string())),
            (None, None) => None,
        })
        .collect()
}
