//! Task status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress state of a task (or of a proxy phase).
///
/// State transitions:
/// - Pending -> Running -> Completed (monotonic while executing)
/// - any -> Pending (only via `reset()`)
/// - any -> Cancelled (owner-defined; never re-entered by the scheduler)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet, or reset.
    #[default]
    Pending,

    /// Partially done; more `execute()` calls are needed.
    Running,

    /// All work done.
    Completed,

    /// Abandoned by its owner.
    Cancelled,
}

impl TaskStatus {
    /// Is this a terminal state (skipped by dequeue)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
