//! Task contract, proxies, and the shared handle the queue stores.
//!
//! - **Task**: ユーザーが実装する作業単位（id, name, status, execute, reset）
//! - **TaskProxy**: Before / After / Extra フェーズを追加するデコレータ
//! - **TaskHandle**: キューに登録された Task / TaskProxy の共有ハンドル

mod handle;
mod proxy;

pub use handle::TaskHandle;
pub use proxy::{ProxyKind, TaskProxy};

use async_trait::async_trait;

use crate::domain::{TaskError, TaskId, TaskStatus};

/// A unit of resumable work driven by the scheduler.
///
/// `execute()` is called once per scheduler tick until `status()` reports a
/// terminal state, so each call should make bounded, incremental progress and
/// keep its own progress counter.
///
/// # Example
/// ```ignore
/// struct Collect { id: TaskId, status: TaskStatus, left: u32 }
///
/// #[async_trait]
/// impl Task for Collect {
///     fn id(&self) -> TaskId { self.id }
///     fn name(&self) -> &str { "collect" }
///     fn status(&self) -> TaskStatus { self.status }
///
///     async fn execute(&mut self) -> Result<(), TaskError> {
///         self.left -= 1;
///         self.status = if self.left == 0 { TaskStatus::Completed } else { TaskStatus::Running };
///         Ok(())
///     }
///
///     fn reset(&mut self) -> Result<(), TaskError> {
///         self.left = 3;
///         self.status = TaskStatus::Pending;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send {
    /// Process-unique identifier, generated once.
    fn id(&self) -> TaskId;

    fn name(&self) -> &str;

    fn status(&self) -> TaskStatus;

    /// Perform one quantum of work and update `status()`.
    ///
    /// Queue entries whose status is terminal are never executed. A task
    /// used as an `Extra` proxy phase is the exception: it runs on every
    /// call to the proxy, whatever its own status.
    ///
    /// The task may read or change the queue it lives in, but must not
    /// reset itself through it (`reset_one` / `reset_all` would wait for
    /// this very call to finish).
    async fn execute(&mut self) -> Result<(), TaskError>;

    /// Return to `Pending`. Must be idempotent and safe mid-`Running`.
    fn reset(&mut self) -> Result<(), TaskError>;

    /// One-line description for logs.
    fn describe(&self) -> String {
        format!("{}[{}] ({})", self.name(), self.id(), self.status())
    }
}
