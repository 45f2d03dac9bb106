//! Test fixtures shared by unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{TaskError, TaskId, TaskStatus};
use crate::task::Task;

/// Records the name of every task whose `execute()` ran, in order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExecutionLog(Arc<Mutex<Vec<String>>>);

impl ExecutionLog {
    pub(crate) fn push(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|n| *n == name).count()
    }
}

/// A task that completes after `steps` calls to `execute()`.
pub(crate) struct StepTask {
    id: TaskId,
    name: String,
    status: TaskStatus,
    steps: u32,
    done: u32,
    log: ExecutionLog,
    fail_execute: bool,
    fail_reset: bool,
    delay: Option<Duration>,
}

impl StepTask {
    pub(crate) fn new(name: &str, steps: u32, log: &ExecutionLog) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.to_string(),
            status: TaskStatus::Pending,
            steps,
            done: 0,
            log: log.clone(),
            fail_execute: false,
            fail_reset: false,
            delay: None,
        }
    }

    pub(crate) fn failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    pub(crate) fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Sleep this long inside every `execute()`.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn cancelled(mut self) -> Self {
        self.status = TaskStatus::Cancelled;
        self
    }
}

#[async_trait]
impl Task for StepTask {
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
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.push(&self.name);
        if self.fail_execute {
            return Err(TaskError::execution(format!("{} refused to run", self.name)));
        }
        self.done += 1;
        self.status = if self.done >= self.steps {
            TaskStatus::Completed
        } else {
            TaskStatus::Running
        };
        Ok(())
    }

    fn reset(&mut self) -> Result<(), TaskError> {
        if self.fail_reset {
            return Err(TaskError::reset(format!("{} cannot be reset", self.name)));
        }
        self.done = 0;
        self.status = TaskStatus::Pending;
        Ok(())
    }
}
