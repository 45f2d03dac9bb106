#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shuttle_core::{Task, TaskError, TaskId, TaskStatus};

/// Records the name of every task whose `execute()` ran, in order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog(Arc<Mutex<Vec<String>>>);

impl ExecutionLog {
    pub fn push(&self, name: &str) {
        self.0.lock().unwrap().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn count(&self, name: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|n| *n == name).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Normal,
    FailExecute,
    /// Panic on the first `n` calls.
    Panic(u32),
}

/// Completes after `steps` executions.
pub struct StepTask {
    id: TaskId,
    name: String,
    status: TaskStatus,
    steps: u32,
    done: u32,
    behavior: Behavior,
    log: ExecutionLog,
}

impl StepTask {
    pub fn new(name: &str, steps: u32, log: &ExecutionLog) -> Self {
        Self {
            id: TaskId::generate(),
            name: name.to_string(),
            status: TaskStatus::Pending,
            steps,
            done: 0,
            behavior: Behavior::Normal,
            log: log.clone(),
        }
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
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
        self.log.push(&self.name);
        match self.behavior {
            Behavior::Normal => {}
            Behavior::FailExecute => {
                return Err(TaskError::execution(format!("{} always fails", self.name)));
            }
            Behavior::Panic(left) if left > 0 => {
                self.behavior = Behavior::Panic(left - 1);
                panic!("{} blew up", self.name);
            }
            Behavior::Panic(_) => {}
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
        self.done = 0;
        self.status = TaskStatus::Pending;
        Ok(())
    }
}
