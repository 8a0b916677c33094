//! Command execution result type.

use crate::models::{NodeId, OutputLine};

/// Result of executing a builtin.
///
/// Builtins never touch the session directly. They describe the output and
/// the two mutations the coordinator may apply: a new cwd (`cd`) or a
/// transcript truncation (`clear`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandResult {
    /// Output lines to display
    pub output: Vec<OutputLine>,
    /// Directory to make current (e.g., for `cd` command)
    pub cwd: Option<NodeId>,
    /// Truncate the transcript instead of appending
    pub clear: bool,
}

impl CommandResult {
    /// Create a result with just output, no mutation.
    pub fn output(lines: Vec<OutputLine>) -> Self {
        Self {
            output: lines,
            ..Self::default()
        }
    }

    /// Create a single error line result.
    pub fn error(message: impl Into<String>) -> Self {
        Self::output(vec![OutputLine::error(message)])
    }

    /// Create a result that changes the current directory.
    pub fn change_dir(id: NodeId) -> Self {
        Self {
            cwd: Some(id),
            ..Self::default()
        }
    }

    /// Create a result that clears the transcript.
    pub fn clear() -> Self {
        Self {
            clear: true,
            ..Self::default()
        }
    }

    /// Create an empty result (no output, no mutation).
    pub fn empty() -> Self {
        Self::default()
    }
}
