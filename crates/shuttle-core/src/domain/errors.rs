//! Errors - タスク内部で起きるエラー
//!
//! スケジューラ自体のエラー（不正な状態遷移など）は `crate::error` にあります。
//! ここは Task 実装が返すエラーで、ワーカーループやキューはこれを
//! ログに残して処理を続けます（fail-fast ではない）。

use std::fmt;

/// ErrorKind は task-local なエラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `execute()` failed.
    Execution,
    /// `reset()` failed.
    Reset,
    /// `execute()` panicked and was contained at the worker boundary.
    Panicked,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Execution => "execution",
            ErrorKind::Reset => "reset",
            ErrorKind::Panicked => "panic",
        };
        f.write_str(label)
    }
}

/// TaskError is returned by `Task::execute` / `Task::reset`.
#[derive(Debug, thiserror::Error)]
#[error("task {kind} failed: {message}")]
pub struct TaskError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TaskError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, message)
    }

    pub fn reset(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Reset, message)
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Panicked, message)
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_includes_kind_and_message() {
        let err = TaskError::reset("device busy");
        assert_eq!(err.to_string(), "task reset failed: device busy");
        assert_eq!(err.kind(), ErrorKind::Reset);
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("pipe closed");
        let err = TaskError::execution("screenshot").with_source(io);
        assert!(err.source().is_some());
        assert_eq!(err.message(), "screenshot");
    }
}
