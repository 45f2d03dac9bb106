//! Read-only views of a queue for logs, status pages, and persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{TaskId, TaskStatus};
use crate::task::ProxyKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl QueueCounts {
    pub(crate) fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Running => self.running += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.running + self.completed + self.cancelled
    }

    /// Entries that dequeue would still hand out.
    pub fn incomplete(&self) -> usize {
        self.pending + self.running
    }
}

/// State of one queue entry at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub name: String,
    pub priority: i64,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyPhaseSnapshot>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyPhaseSnapshot {
    pub kind: ProxyKind,
    pub status: TaskStatus,
}

/// Entries in dequeue order. `stop()` resets every task, so take one of these
/// first if progress must survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub captured_at: DateTime<Utc>,
    pub tasks: Vec<TaskSnapshot>,
}

impl QueueSnapshot {
    pub fn counts(&self) -> QueueCounts {
        let mut counts = QueueCounts::default();
        for task in &self.tasks {
            counts.record(task.status);
        }
        counts
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
