//! TaskProxy - 追加フェーズ付きのタスク
//!
//! プロキシは内側の Task を所有し、独立した状態を持つフェーズを一つ追加します。
//! フェーズ自体も `Task` として表現するので、`proxy_phase_status()` は
//! フェーズの `status()` そのものです。
//!
//! | kind   | execute()                                              |
//! |--------|--------------------------------------------------------|
//! | Before | フェーズ未完了ならフェーズ、完了後は内側へ委譲         |
//! | After  | 内側が未完了なら内側へ委譲、完了後はフェーズ           |
//! | Extra  | 毎回フェーズ → 内側（ゲートしない）                    |

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Task;
use crate::domain::{TaskError, TaskId, TaskStatus};

/// Which extra phase a proxy injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyKind {
    /// Phase must complete once before the inner task runs.
    Before,
    /// Phase runs once the inner task has completed.
    After,
    /// Phase runs on every call, before the inner task.
    Extra,
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProxyKind::Before => "before",
            ProxyKind::After => "after",
            ProxyKind::Extra => "extra",
        };
        f.write_str(label)
    }
}

/// Decorator over one inner task.
///
/// The proxy keeps the inner task's identity: `id()` and `name()` are the
/// inner task's.
pub struct TaskProxy {
    kind: ProxyKind,
    phase: Box<dyn Task>,
    inner: Box<dyn Task>,
}

impl TaskProxy {
    pub fn new(kind: ProxyKind, phase: impl Task + 'static, inner: impl Task + 'static) -> Self {
        Self {
            kind,
            phase: Box::new(phase),
            inner: Box::new(inner),
        }
    }

    pub fn before(phase: impl Task + 'static, inner: impl Task + 'static) -> Self {
        Self::new(ProxyKind::Before, phase, inner)
    }

    pub fn after(phase: impl Task + 'static, inner: impl Task + 'static) -> Self {
        Self::new(ProxyKind::After, phase, inner)
    }

    pub fn extra(phase: impl Task + 'static, inner: impl Task + 'static) -> Self {
        Self::new(ProxyKind::Extra, phase, inner)
    }

    pub fn kind(&self) -> ProxyKind {
        self.kind
    }

    pub fn id(&self) -> TaskId {
        self.inner.id()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn inner(&self) -> &dyn Task {
        self.inner.as_ref()
    }

    pub fn proxy_phase_status(&self) -> TaskStatus {
        self.phase.status()
    }

    /// Composite status seen by the queue.
    pub fn status(&self) -> TaskStatus {
        let inner = self.inner.status();
        if self.kind == ProxyKind::Extra {
            return inner;
        }
        composite_status(self.phase.status(), inner)
    }

    /// Run one quantum: either the phase or the inner task (both for `Extra`).
    pub async fn execute(&mut self) -> Result<(), TaskError> {
        match self.kind {
            ProxyKind::Before => {
                if self.phase.status() != TaskStatus::Completed {
                    self.phase.execute().await
                } else {
                    self.inner.execute().await
                }
            }
            ProxyKind::After => {
                if self.inner.status() == TaskStatus::Completed {
                    self.phase.execute().await
                } else {
                    self.inner.execute().await
                }
            }
            ProxyKind::Extra => {
                // フェーズが失敗しても内側は毎回実行する
                let phase = self.phase.execute().await;
                let inner = self.inner.execute().await;
                phase.and(inner)
            }
        }
    }

    /// Reset both the phase and the inner task.
    ///
    /// Both resets are attempted; the first failure is returned.
    pub fn reset(&mut self) -> Result<(), TaskError> {
        let phase = self.phase.reset();
        let inner = self.inner.reset();
        phase.and(inner)
    }

    /// Reset only the phase, leaving the inner task's progress intact.
    pub fn reset_proxy_phase(&mut self) -> Result<(), TaskError> {
        self.phase.reset()
    }

    pub fn describe(&self) -> String {
        format!(
            "{} [{} phase {} ({})]",
            self.inner.describe(),
            self.kind,
            self.phase.name(),
            self.phase.status()
        )
    }
}

impl fmt::Debug for TaskProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskProxy")
            .field("kind", &self.kind)
            .field("phase", &self.phase.describe())
            .field("inner", &self.inner.describe())
            .finish()
    }
}

/// Running wins over everything; Completed needs both parts; otherwise Pending.
///
/// A cancelled part (phase or inner) cancels the whole proxy, otherwise a dead
/// gate would be selected forever.
fn composite_status(phase: TaskStatus, inner: TaskStatus) -> TaskStatus {
    if phase == TaskStatus::Cancelled || inner == TaskStatus::Cancelled {
        return TaskStatus::Cancelled;
    }
    if phase == TaskStatus::Running || inner == TaskStatus::Running {
        TaskStatus::Running
    } else if phase == TaskStatus::Completed && inner == TaskStatus::Completed {
        TaskStatus::Completed
    } else {
        TaskStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ExecutionLog, StepTask};
    use rstest::rstest;

    use TaskStatus::{Cancelled, Completed, Pending, Running};

    #[rstest]
    #[case::both_pending(Pending, Pending, Pending)]
    #[case::phase_running(Running, Pending, Running)]
    #[case::inner_running(Completed, Running, Running)]
    #[case::phase_done_inner_pending(Completed, Pending, Pending)]
    #[case::inner_done_phase_pending(Pending, Completed, Pending)]
    #[case::both_done(Completed, Completed, Completed)]
    #[case::inner_cancelled(Running, Cancelled, Cancelled)]
    #[case::phase_cancelled(Cancelled, Pending, Cancelled)]
    #[case::phase_cancelled_inner_running(Cancelled, Running, Cancelled)]
    fn composite_status_table(
        #[case] phase: TaskStatus,
        #[case] inner: TaskStatus,
        #[case] expected: TaskStatus,
    ) {
        assert_eq!(composite_status(phase, inner), expected);
    }

    #[tokio::test]
    async fn before_gate_blocks_inner_until_completed() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::before(
            StepTask::new("gate", 2, &log),
            StepTask::new("work", 2, &log),
        );

        proxy.execute().await.unwrap();
        assert_eq!(proxy.proxy_phase_status(), Running);
        assert_eq!(proxy.inner().status(), Pending);
        assert_eq!(proxy.status(), Running);

        proxy.execute().await.unwrap();
        assert_eq!(proxy.proxy_phase_status(), Completed);
        assert_eq!(log.entries(), vec!["gate", "gate"]);

        proxy.execute().await.unwrap();
        proxy.execute().await.unwrap();
        assert_eq!(log.entries(), vec!["gate", "gate", "work", "work"]);
        assert_eq!(proxy.status(), Completed);
    }

    #[tokio::test]
    async fn after_phase_runs_only_once_inner_completed() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::after(
            StepTask::new("report", 1, &log),
            StepTask::new("work", 2, &log),
        );

        proxy.execute().await.unwrap();
        assert_eq!(proxy.status(), Running);
        proxy.execute().await.unwrap();
        // 内側は完了、フェーズは未実行
        assert_eq!(proxy.inner().status(), Completed);
        assert_eq!(proxy.status(), Pending);

        proxy.execute().await.unwrap();
        assert_eq!(log.entries(), vec!["work", "work", "report"]);
        assert_eq!(proxy.status(), Completed);
    }

    #[tokio::test]
    async fn extra_phase_runs_every_call_without_gating() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::extra(
            StepTask::new("guard", 1, &log),
            StepTask::new("work", 3, &log),
        );

        for _ in 0..3 {
            proxy.execute().await.unwrap();
        }

        assert_eq!(
            log.entries(),
            vec!["guard", "work", "guard", "work", "guard", "work"]
        );
        assert_eq!(proxy.status(), Completed);
    }

    #[tokio::test]
    async fn extra_inner_runs_even_when_phase_fails() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::extra(
            StepTask::new("guard", 1, &log).failing_execute(),
            StepTask::new("work", 1, &log),
        );

        let result = proxy.execute().await;

        assert!(result.is_err());
        assert_eq!(proxy.inner().status(), Completed);
    }

    #[tokio::test]
    async fn reset_clears_phase_and_inner() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::before(
            StepTask::new("gate", 1, &log),
            StepTask::new("work", 3, &log),
        );
        proxy.execute().await.unwrap();
        proxy.execute().await.unwrap();

        proxy.reset().unwrap();

        assert_eq!(proxy.proxy_phase_status(), Pending);
        assert_eq!(proxy.inner().status(), Pending);
    }

    #[tokio::test]
    async fn reset_still_resets_inner_when_phase_reset_fails() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::before(
            StepTask::new("gate", 1, &log).failing_reset(),
            StepTask::new("work", 3, &log),
        );
        proxy.execute().await.unwrap();
        proxy.execute().await.unwrap();
        assert_eq!(proxy.inner().status(), Running);

        assert!(proxy.reset().is_err());
        assert_eq!(proxy.inner().status(), Pending);
    }

    #[tokio::test]
    async fn reset_proxy_phase_keeps_inner_progress() {
        let log = ExecutionLog::default();
        let mut proxy = TaskProxy::before(
            StepTask::new("gate", 1, &log),
            StepTask::new("work", 3, &log),
        );
        proxy.execute().await.unwrap();
        proxy.execute().await.unwrap();

        proxy.reset_proxy_phase().unwrap();

        assert_eq!(proxy.proxy_phase_status(), Pending);
        assert_eq!(proxy.inner().status(), Running);
    }

    #[test]
    fn proxy_keeps_inner_identity() {
        let log = ExecutionLog::default();
        let inner = StepTask::new("work", 1, &log);
        let inner_id = inner.id();
        let proxy = TaskProxy::after(StepTask::new("report", 1, &log), inner);

        assert_eq!(proxy.id(), inner_id);
        assert_eq!(proxy.name(), "work");
        assert!(proxy.describe().contains("after phase report"));
    }
}
