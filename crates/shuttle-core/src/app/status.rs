//! Status - スケジューラの状態
//!
//! Pending → (start) → Running → (stop) → Pending
//! Running → (pause) → Paused → (resume) → Running
//! Paused → (stop) → Pending

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerStatus {
    /// Not started, or stopped. Can be started (again).
    #[default]
    Pending,
    Running,
    Paused,
}

impl fmt::Display for SchedulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SchedulerStatus::Pending => "pending",
            SchedulerStatus::Running => "running",
            SchedulerStatus::Paused => "paused",
        };
        f.write_str(label)
    }
}
