//! TaskScheduler - 単一ワーカーのスケジューラ
//!
//! 状態は一つの `watch` チャンネルだけに持たせています。
//! - 状態遷移は `send_if_modified` による check-and-set（分割されたフラグなし）
//! - ワーカーは同じチャンネルで pause ゲートと stop を待つので、resume の取りこぼしがない
//! - `start` / `stop` は `&mut self` なので、ワーカーハンドルの競合もない

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::worker_loop::WorkerLoop;
use super::{SchedulerBuilder, SchedulerStatus};
use crate::config::SchedulerConfig;
use crate::domain::SchedulerId;
use crate::error::SchedulerError;
use crate::queue::TaskQueue;

/// Drives one [`TaskQueue`] with a single background worker.
///
/// Instances are restartable: after `stop()` the scheduler is `Pending` again
/// and `start()` may be called any number of times.
pub struct TaskScheduler {
    id: SchedulerId,
    config: SchedulerConfig,
    queue: Option<Arc<TaskQueue>>,
    status_tx: watch::Sender<SchedulerStatus>,
    worker: Option<JoinHandle<()>>,
    /// Set from the moment `stop()` flips the status until its reset is done.
    reset_pending: bool,
}

impl TaskScheduler {
    /// Unvalidated; public construction goes through [`SchedulerBuilder`].
    pub(crate) fn new(config: SchedulerConfig) -> Self {
        let (status_tx, _) = watch::channel(SchedulerStatus::Pending);
        Self {
            id: SchedulerId::generate(),
            config,
            queue: None,
            status_tx,
            worker: None,
            reset_pending: false,
        }
    }

    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    pub fn id(&self) -> SchedulerId {
        self.id
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn status(&self) -> SchedulerStatus {
        *self.status_tx.borrow()
    }

    pub fn queue(&self) -> Option<&Arc<TaskQueue>> {
        self.queue.as_ref()
    }

    /// Bind the queue to drive. Only allowed while `Pending`.
    pub fn attach_queue(&mut self, queue: Arc<TaskQueue>) -> Result<(), SchedulerError> {
        if self.reset_pending {
            return Err(SchedulerError::StopInProgress);
        }
        let status = self.status();
        if status != SchedulerStatus::Pending {
            return Err(SchedulerError::InvalidState {
                op: "attach a queue to",
                status,
            });
        }
        self.queue = Some(queue);
        Ok(())
    }

    /// Spawn the worker loop. Must be called inside a tokio runtime.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        let queue = self.queue.clone().ok_or(SchedulerError::NoQueueAttached)?;
        if self.reset_pending {
            return Err(SchedulerError::StopInProgress);
        }
        self.transition("start", SchedulerStatus::Pending, SchedulerStatus::Running)?;

        let worker = WorkerLoop::new(
            self.id,
            queue,
            self.status_tx.subscribe(),
            self.config.poll_interval,
        );
        self.worker = Some(tokio::spawn(worker.run()));
        info!(scheduler = %self.id, poll_interval = ?self.config.poll_interval, "scheduler started");
        Ok(())
    }

    /// Stop the worker, wait for it to exit, then reset every task.
    ///
    /// No `execute()` call happens after this returns. No-op when `Pending`.
    ///
    /// If the returned future is dropped early, the worker handle is kept and
    /// `start()` refuses until a later `stop()` finishes the join and reset.
    pub async fn stop(&mut self) {
        let previous = self.status_tx.send_replace(SchedulerStatus::Pending);
        if previous != SchedulerStatus::Pending {
            self.reset_pending = true;
        } else if self.worker.is_none() && !self.reset_pending {
            return;
        }

        // join が終わるまでハンドルは手放さない
        if let Some(worker) = self.worker.as_mut() {
            let joined = worker.await;
            self.worker = None;
            if let Err(error) = joined {
                warn!(scheduler = %self.id, %error, "worker loop terminated abnormally");
            }
        }

        if let Some(queue) = &self.queue {
            queue.reset_all().await;
        }
        self.reset_pending = false;
        info!(scheduler = %self.id, "scheduler stopped");
    }

    /// Suspend between ticks. The worker blocks without spinning.
    pub fn pause(&self) -> Result<(), SchedulerError> {
        self.transition("pause", SchedulerStatus::Running, SchedulerStatus::Paused)?;
        info!(scheduler = %self.id, "scheduler paused");
        Ok(())
    }

    pub fn resume(&self) -> Result<(), SchedulerError> {
        self.transition("resume", SchedulerStatus::Paused, SchedulerStatus::Running)?;
        info!(scheduler = %self.id, "scheduler resumed");
        Ok(())
    }

    /// Atomically move `from` -> `to`, or report the status actually seen.
    fn transition(
        &self,
        op: &'static str,
        from: SchedulerStatus,
        to: SchedulerStatus,
    ) -> Result<(), SchedulerError> {
        let mut observed = from;
        let changed = self.status_tx.send_if_modified(|status| {
            if *status == from {
                *status = to;
                true
            } else {
                observed = *status;
                false
            }
        });
        if changed {
            Ok(())
        } else {
            Err(SchedulerError::InvalidState {
                op,
                status: observed,
            })
        }
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl fmt::Display for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TaskScheduler({}, status={}, poll_interval={:?}, queue={})",
            self.id,
            self.status(),
            self.config.poll_interval,
            if self.queue.is_some() { "attached" } else { "none" }
        )
    }
}
