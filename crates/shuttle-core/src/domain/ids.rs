//! Domain identifiers (strongly-typed IDs).
//!
//! ULID を包む `Id<T>` に Phantom type のマーカーを付けて、
//! `TaskId` と `SchedulerId` をコンパイル時に区別します。
//!
//! ログの `task` / `scheduler` フィールドは両方とも同じ ULID 文字列なので、
//! `TaskQueue::remove(scheduler.id())` のような取り違えを型で弾くのが目的です。
//! プロキシは内側タスクの `TaskId` をそのまま名乗るため、
//! キューで id を比較する箇所はすべて `TaskId` 同士になります。
//!
//! - 生成は一度だけ（`Id::generate()`）で、その後は不変
//! - プロセス内で一意（ULID のランダム部 80-bit）
//! - Display はプレフィックス付き（"task-", "scheduler-"）

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックスを提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// `T` は PhantomData で、実行時にはメモリを消費しません。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// 新しい ID を生成
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

/// Task のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

/// Scheduler のマーカー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheduler {}

impl IdMarker for Scheduler {
    fn prefix() -> &'static str {
        "scheduler-"
    }
}

/// Identifier of a schedulable task (stable for the task's lifetime).
pub type TaskId = Id<Task>;

/// Identifier of a scheduler instance (used as log context).
pub type SchedulerId = Id<Scheduler>;
