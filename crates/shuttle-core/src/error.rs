use thiserror::Error;

use crate::app::SchedulerStatus;

/// Errors from the scheduler's control surface.
///
/// Every variant leaves the scheduler's state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("a task queue must be attached before starting the scheduler")]
    NoQueueAttached,

    #[error("a previous stop() did not finish; await stop() before starting again")]
    StopInProgress,

    #[error("cannot {op} scheduler while it is {status}")]
    InvalidState {
        op: &'static str,
        status: SchedulerStatus,
    },
}
