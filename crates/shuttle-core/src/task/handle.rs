//! TaskHandle - キューが保持する共有ハンドル
//!
//! キューのロックを握ったまま `execute()` を走らせないために、
//! 各タスクは自分専用の Mutex に入れて `Arc` で共有します。
//! ロック順序は常に「キュー → タスク」。
//!
//! status / describe は読み取り専用の `watch` に公開した最新の値を返すので、
//! 実行中のタスク自身がキューを覗いても自分のロックを待つことはありません。

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, watch};

use super::{ProxyKind, Task, TaskProxy};
use crate::domain::{TaskError, TaskId, TaskStatus};

/// Tagged union of what can be scheduled.
enum Runnable {
    Task(Box<dyn Task>),
    Proxy(TaskProxy),
}

impl Runnable {
    fn status(&self) -> TaskStatus {
        match self {
            Runnable::Task(task) => task.status(),
            Runnable::Proxy(proxy) => proxy.status(),
        }
    }

    async fn execute(&mut self) -> Result<(), TaskError> {
        match self {
            Runnable::Task(task) => task.execute().await,
            Runnable::Proxy(proxy) => proxy.execute().await,
        }
    }

    fn reset(&mut self) -> Result<(), TaskError> {
        match self {
            Runnable::Task(task) => task.reset(),
            Runnable::Proxy(proxy) => proxy.reset(),
        }
    }

    fn view(&self) -> TaskView {
        match self {
            Runnable::Task(task) => TaskView {
                status: task.status(),
                proxy_phase: None,
                description: task.describe(),
            },
            Runnable::Proxy(proxy) => TaskView {
                status: proxy.status(),
                proxy_phase: Some(proxy.proxy_phase_status()),
                description: proxy.describe(),
            },
        }
    }
}

/// Last observed state of a task, readable without its lock.
#[derive(Debug, Clone)]
struct TaskView {
    status: TaskStatus,
    proxy_phase: Option<TaskStatus>,
    description: String,
}

/// Shared, lock-protected handle to a registered task or proxy.
///
/// Cloning the handle shares the same task; adding the same handle twice
/// schedules the same instance twice.
///
/// Reads (`status`, `proxy_phase_status`, `describe`) never wait: while the
/// task is busy they return the state published after its last mutation.
#[derive(Clone)]
pub struct TaskHandle {
    id: TaskId,
    name: Arc<str>,
    proxy: Option<ProxyKind>,
    cell: Arc<Mutex<Runnable>>,
    view: Arc<watch::Sender<TaskView>>,
}

impl TaskHandle {
    pub fn new(task: impl Task + 'static) -> Self {
        Self::from_boxed(Box::new(task))
    }

    pub fn from_boxed(task: Box<dyn Task>) -> Self {
        let name = Arc::from(task.name());
        Self::wrap(task.id(), name, None, Runnable::Task(task))
    }

    fn wrap(id: TaskId, name: Arc<str>, proxy: Option<ProxyKind>, runnable: Runnable) -> Self {
        let (view, _) = watch::channel(runnable.view());
        Self {
            id,
            name,
            proxy,
            cell: Arc::new(Mutex::new(runnable)),
            view: Arc::new(view),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Some(kind)` when this handle wraps a [`TaskProxy`].
    pub fn proxy_kind(&self) -> Option<ProxyKind> {
        self.proxy
    }

    /// Do both handles point at the same task instance?
    pub fn same_as(&self, other: &TaskHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    /// Status as seen by the queue (composite for proxies).
    pub fn status(&self) -> TaskStatus {
        self.latest().status
    }

    /// The proxy's own phase status; `None` for plain tasks.
    pub fn proxy_phase_status(&self) -> Option<TaskStatus> {
        self.latest().proxy_phase
    }

    pub fn describe(&self) -> String {
        self.latest().description
    }

    /// Run one quantum of work.
    ///
    /// A task that is already terminal is left untouched.
    pub async fn execute(&self) -> Result<(), TaskError> {
        let mut runnable = self.cell.lock().await;
        if runnable.status().is_terminal() {
            return Ok(());
        }
        let result = runnable.execute().await;
        self.publish(&runnable);
        result
    }

    pub async fn reset(&self) -> Result<(), TaskError> {
        let mut runnable = self.cell.lock().await;
        let result = runnable.reset();
        self.publish(&runnable);
        result
    }

    /// Re-arm a proxy's phase without touching the inner task.
    ///
    /// No-op for plain tasks.
    pub async fn reset_proxy_phase(&self) -> Result<(), TaskError> {
        let mut runnable = self.cell.lock().await;
        let result = match &mut *runnable {
            Runnable::Task(_) => Ok(()),
            Runnable::Proxy(proxy) => proxy.reset_proxy_phase(),
        };
        self.publish(&runnable);
        result
    }

    /// Fresh state when the task is idle, the published one while it is busy.
    fn latest(&self) -> TaskView {
        match self.cell.try_lock() {
            Ok(runnable) => self.publish(&runnable),
            Err(_) => self.view.borrow().clone(),
        }
    }

    fn publish(&self, runnable: &Runnable) -> TaskView {
        let view = runnable.view();
        self.view.send_replace(view.clone());
        view
    }
}

impl From<TaskProxy> for TaskHandle {
    fn from(proxy: TaskProxy) -> Self {
        let name = Arc::from(proxy.name());
        Self::wrap(proxy.id(), name, Some(proxy.kind()), Runnable::Proxy(proxy))
    }
}

impl From<Box<dyn Task>> for TaskHandle {
    fn from(task: Box<dyn Task>) -> Self {
        Self::from_boxed(task)
    }
}

impl fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("proxy", &self.proxy)
            .finish()
    }
}
