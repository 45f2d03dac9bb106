//! shuttle-core
//!
//! A cooperative, single-worker task scheduler: a priority-ordered queue of
//! resumable tasks executed one at a time by a background loop that supports
//! start, pause, resume and stop.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, status, errors）
//! - **task**: Task trait, TaskProxy（Before / After / Extra）, TaskHandle
//! - **queue**: 優先度付きの TaskQueue
//! - **app**: TaskScheduler, SchedulerBuilder, ワーカーループ
//! - **config**: SchedulerConfig（poll interval）
//! - **observability**: QueueCounts, QueueSnapshot
//! - **error**: 制御面のエラー（SchedulerError）

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod observability;
pub mod queue;
pub mod task;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{BuildError, SchedulerBuilder, SchedulerStatus, TaskScheduler};
pub use config::{ConfigError, SchedulerConfig};
pub use domain::{ErrorKind, SchedulerId, TaskError, TaskId, TaskStatus};
pub use error::SchedulerError;
pub use observability::{ProxyPhaseSnapshot, QueueCounts, QueueSnapshot, TaskSnapshot};
pub use queue::TaskQueue;
pub use task::{ProxyKind, Task, TaskHandle, TaskProxy};
