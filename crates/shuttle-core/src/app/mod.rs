//! App - スケジューラ層
//!
//! # 主要コンポーネント
//! - **SchedulerBuilder**: 設定の検証とキューのワイヤリング
//! - **TaskScheduler**: start / stop / pause / resume の制御面
//! - **WorkerLoop**: 1 本だけ動くタスク実行ループ（dequeue → execute → sleep）
//! - **SchedulerStatus**: Pending / Running / Paused

pub mod builder;
pub mod scheduler;
pub mod status;
mod worker_loop;

pub use self::builder::{BuildError, SchedulerBuilder};
pub use self::scheduler::TaskScheduler;
pub use self::status::SchedulerStatus;
