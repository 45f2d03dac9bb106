//! In-memory priority queue of tasks.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::entry::EntryKey;
use crate::domain::TaskId;
use crate::observability::{ProxyPhaseSnapshot, QueueCounts, QueueSnapshot, TaskSnapshot};
use crate::task::{ProxyKind, TaskHandle};

/// Queue state guarded by a single lock.
///
/// `entries` and `current` always change together.
#[derive(Default)]
struct TaskQueueState {
    /// Entries in dequeue order (priority desc, insertion asc).
    entries: BTreeMap<EntryKey, TaskHandle>,

    /// Last entry handed out by `next_incomplete`.
    current: Option<TaskHandle>,

    /// Next insertion sequence number.
    next_seq: u64,
}

impl TaskQueueState {
    fn allocate_key(&mut self, priority: i64) -> EntryKey {
        let key = EntryKey {
            priority,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        key
    }
}

/// Thread-safe, priority-ordered container of tasks and proxies.
///
/// Completed entries stay in the queue (addressable by id for `remove` and
/// `reset_*`); dequeue simply skips them.
#[derive(Default)]
pub struct TaskQueue {
    state: Mutex<TaskQueueState>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task with a priority. Higher runs first; ties run in
    /// insertion order.
    ///
    /// Returns the handle stored in the queue. Adding the same handle again
    /// schedules the same instance twice.
    pub async fn add(&self, task: impl Into<TaskHandle>, priority: i64) -> TaskHandle {
        let handle = task.into();
        let mut state = self.state.lock().await;
        let key = state.allocate_key(priority);
        state.entries.insert(key, handle.clone());
        debug!(task = %handle.id(), name = handle.name(), priority, "task added");
        handle
    }

    /// Remove every entry for `task_id`. Returns how many were removed.
    pub async fn remove(&self, task_id: TaskId) -> usize {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|_, handle| handle.id() != task_id);
        let removed = before - state.entries.len();
        if removed > 0 {
            debug!(task = %task_id, removed, "task removed");
        }
        removed
    }

    pub async fn remove_all(&self) {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.current = None;
        debug!("all tasks removed");
    }

    /// Reset the entries for `task_id`. Failures are logged, not returned.
    pub async fn reset_one(&self, task_id: TaskId) {
        let targets = self.handles(|handle| handle.id() == task_id).await;
        for handle in targets {
            if let Err(error) = handle.reset().await {
                warn!(task = %task_id, %error, "reset of task failed");
            }
        }
    }

    /// Reset every entry. A failing reset is logged and the rest continue.
    pub async fn reset_all(&self) {
        let targets = self.handles(|_| true).await;
        let mut failed = 0usize;
        for handle in &targets {
            if let Err(error) = handle.reset().await {
                failed += 1;
                warn!(task = %handle.id(), name = handle.name(), %error, "reset of task failed");
            }
        }
        debug!(total = targets.len(), failed, "queue reset");
    }

    /// Clone matching handles so task locks are awaited after the queue lock
    /// is released.
    async fn handles(&self, filter: impl Fn(&TaskHandle) -> bool) -> Vec<TaskHandle> {
        let state = self.state.lock().await;
        state.entries.values().filter(|h| filter(h)).cloned().collect()
    }

    /// Select the highest-priority entry that is not terminal.
    ///
    /// When the selection moves away from a `Before` proxy, that proxy's gate
    /// phase is re-armed so the next visit runs it again.
    ///
    /// `None` means the queue is idle.
    pub async fn next_incomplete(&self) -> Option<TaskHandle> {
        let mut state = self.state.lock().await;

        let mut selected = None;
        for handle in state.entries.values() {
            if !handle.status().is_terminal() {
                selected = Some(handle.clone());
                break;
            }
        }
        let selected = selected?;

        if let Some(current) = state.current.as_ref()
            && current.proxy_kind() == Some(ProxyKind::Before)
            && !current.same_as(&selected)
        {
            debug!(task = %current.id(), next = %selected.id(), "task switch, re-arming gate");
            if let Err(error) = current.reset_proxy_phase().await {
                warn!(task = %current.id(), %error, "reset of task failed");
            }
        }

        state.current = Some(selected.clone());
        Some(selected)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }

    pub async fn contains(&self, task_id: TaskId) -> bool {
        let state = self.state.lock().await;
        state.entries.values().any(|h| h.id() == task_id)
    }

    /// Last entry handed out by `next_incomplete`.
    pub async fn current(&self) -> Option<TaskHandle> {
        self.state.lock().await.current.clone()
    }

    pub async fn counts(&self) -> QueueCounts {
        let state = self.state.lock().await;
        let mut counts = QueueCounts::default();
        for handle in state.entries.values() {
            counts.record(handle.status());
        }
        counts
    }

    pub async fn snapshot(&self) -> QueueSnapshot {
        let state = self.state.lock().await;
        let mut tasks = Vec::with_capacity(state.entries.len());
        for (key, handle) in &state.entries {
            let proxy = match (handle.proxy_kind(), handle.proxy_phase_status()) {
                (Some(kind), Some(status)) => Some(ProxyPhaseSnapshot { kind, status }),
                _ => None,
            };
            tasks.push(TaskSnapshot {
                id: handle.id(),
                name: handle.name().to_string(),
                priority: key.priority,
                status: handle.status(),
                proxy,
                description: handle.describe(),
            });
        }
        QueueSnapshot {
            captured_at: Utc::now(),
            tasks,
        }
    }

    /// e.g. `TaskQueue(2 tasks: [p=5 collect[task-…] (running), ...])`
    pub async fn describe(&self) -> String {
        let state = self.state.lock().await;
        let mut out = format!("TaskQueue({} tasks: [", state.entries.len());
        for (i, (key, handle)) in state.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "p={} {}", key.priority, handle.describe());
        }
        out.push_str("])");
        out
    }
}
