//! デモ用のタスク
//!
//! 実際の自動化ロジック（スクリーンショット、タップなど）の代わりに、
//! 決まった回数だけ進むカウンタとして振る舞います。

use async_trait::async_trait;
use shuttle_core::{Task, TaskError, TaskId, TaskStatus};
use tracing::info;

/// Finishes after `steps` ticks.
pub struct Chore {
    id: TaskId,
    name: String,
    status: TaskStatus,
    steps: u32,
    done: u32,
}

impl Chore {
    pub fn new(name: impl Into<String>, steps: u32) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.into(),
            status: TaskStatus::Pending,
            steps,
            done: 0,
        }
    }
}

#[async_trait]
impl Task for Chore {
    fn id(&self) -> TaskId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> TaskStatus {
        self.status
    }

    async fn execute(&mut self) -> Result<(), TaskError> {
        self.done += 1;
        info!(task = %self.name, step = self.done, of = self.steps, "working");
        self.status = if self.done >= self.steps {
            TaskStatus::Completed
        } else {
            TaskStatus::Running
        };
        Ok(())
    }

    fn reset(&mut self) -> Result<(), TaskError> {
        self.done = 0;
        self.status = TaskStatus::Pending;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} {}/{} ({})", self.name, self.done, self.steps, self.status)
    }
}

/// Per-tick side effect for an extra phase; never completes.
pub struct Heartbeat {
    id: TaskId,
    beats: u64,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self {
            id: TaskId::generate(),
            beats: 0,
        }
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for Heartbeat {
    fn id(&self) -> TaskId {
        self.id
    }

    fn name(&self) -> &str {
        "heartbeat"
    }

    fn status(&self) -> TaskStatus {
        if self.beats == 0 {
            TaskStatus::Pending
        } else {
            TaskStatus::Running
        }
    }

    async fn execute(&mut self) -> Result<(), TaskError> {
        self.beats += 1;
        info!(beats = self.beats, "heartbeat");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), TaskError> {
        self.beats = 0;
        Ok(())
    }
}
