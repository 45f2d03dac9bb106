//! SchedulerBuilder - スケジューラの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に設定を検証し、不正ならその場で BuildError を返す
//! - poll_interval が 0 だとアイドル時にループが空回りするので拒否する

use std::sync::Arc;
use std::time::Duration;

use super::TaskScheduler;
use crate::config::SchedulerConfig;
use crate::queue::TaskQueue;

/// Builds a [`TaskScheduler`], optionally with its queue already attached.
///
/// ```ignore
/// let scheduler = TaskScheduler::builder()
///     .queue(queue)
///     .poll_interval(Duration::from_millis(100))
///     .build()?;
/// ```
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    queue: Option<Arc<TaskQueue>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.config.poll_interval = poll_interval;
        self
    }

    pub fn queue(mut self, queue: Arc<TaskQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn build(self) -> Result<TaskScheduler, BuildError> {
        if self.config.poll_interval.is_zero() {
            return Err(BuildError::ZeroPollInterval);
        }
        let mut scheduler = TaskScheduler::new(self.config);
        if let Some(queue) = self.queue {
            // 新しいスケジューラは必ず Pending なので失敗しない
            let _ = scheduler.attach_queue(queue);
        }
        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SchedulerStatus;

    #[test]
    fn test_build_with_queue() {
        let scheduler = SchedulerBuilder::new()
            .queue(Arc::new(TaskQueue::new()))
            .poll_interval(Duration::from_millis(100))
            .build()
            .unwrap();

        assert!(scheduler.queue().is_some());
        assert_eq!(scheduler.config().poll_interval, Duration::from_millis(100));
        assert_eq!(scheduler.status(), SchedulerStatus::Pending);
    }

    #[test]
    fn test_build_without_queue() {
        let scheduler = SchedulerBuilder::new().build().unwrap();
        assert!(scheduler.queue().is_none());
    }

    #[test]
    fn test_build_zero_interval() {
        let result = SchedulerBuilder::new()
            .config(SchedulerConfig::default().with_poll_interval(Duration::ZERO))
            .build();
        assert!(matches!(result, Err(BuildError::ZeroPollInterval)));
    }

    #[test]
    fn zero_interval_from_json_is_rejected_too() {
        let config = SchedulerConfig::from_json_str(r#"{"poll_interval_ms": 0}"#).unwrap();
        let result = SchedulerBuilder::new().config(config).build();
        assert!(matches!(result, Err(BuildError::ZeroPollInterval)));
    }
}
