//! WorkerLoop - タスク実行ループ
//!
//! # フロー（1 tick）
//! 1. 一時停止ゲート: Paused の間は watch の変更を待つ（ビジーウェイトしない）
//! 2. Pending になっていたら終了
//! 3. `TaskQueue::next_incomplete()` で次のタスクを取得
//! 4. 見つかれば `execute()`（失敗・panic はログに残して続行）
//! 5. `poll_interval` だけ待つ（stop で即座に中断）

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, warn};

use super::SchedulerStatus;
use crate::domain::{ErrorKind, SchedulerId, TaskError};
use crate::queue::TaskQueue;
use crate::task::TaskHandle;

pub(crate) struct WorkerLoop {
    scheduler: SchedulerId,
    queue: Arc<TaskQueue>,
    status_rx: watch::Receiver<SchedulerStatus>,
    poll_interval: Duration,
}

impl WorkerLoop {
    pub(crate) fn new(
        scheduler: SchedulerId,
        queue: Arc<TaskQueue>,
        status_rx: watch::Receiver<SchedulerStatus>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            scheduler,
            queue,
            status_rx,
            poll_interval,
        }
    }

    /// Runs until the status becomes `Pending` or the scheduler is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            // Paused の間はここで待つ。resume / stop のどちらでも起きる。
            let status = match self
                .status_rx
                .wait_for(|status| *status != SchedulerStatus::Paused)
                .await
            {
                Ok(status) => *status,
                Err(_) => break,
            };
            if status != SchedulerStatus::Running {
                break;
            }

            self.tick().await;

            let stopped = tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => false,
                _ = self.status_rx.wait_for(|status| *status == SchedulerStatus::Pending) => true,
            };
            if stopped {
                break;
            }
        }
        debug!(scheduler = %self.scheduler, "worker loop exited");
    }

    async fn tick(&self) {
        let Some(task) = self.queue.next_incomplete().await else {
            debug!(
                scheduler = %self.scheduler,
                interval = ?self.poll_interval,
                "queue idle, waiting"
            );
            return;
        };

        debug!(
            scheduler = %self.scheduler,
            task = %task.id(),
            name = task.name(),
            "task selected for execution"
        );

        if let Err(error) = run_contained(task.clone()).await {
            if error.kind() == ErrorKind::Panicked {
                error!(scheduler = %self.scheduler, task = %task.id(), name = task.name(), %error, "task execution panicked");
            } else {
                warn!(scheduler = %self.scheduler, task = %task.id(), name = task.name(), %error, "task execution failed");
            }
        }
    }
}

/// Execute on a separate tokio task so a panic cannot take the loop down.
///
/// The loop awaits the result, so executions stay strictly serial.
async fn run_contained(task: TaskHandle) -> Result<(), TaskError> {
    match tokio::spawn(async move { task.execute().await }).await {
        Ok(result) => result,
        Err(join_error) => Err(TaskError::panicked(join_error.to_string())),
    }
}
