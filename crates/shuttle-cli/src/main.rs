mod tasks;

use std::sync::Arc;
use std::time::Duration;

use shuttle_core::{SchedulerConfig, TaskHandle, TaskProxy, TaskQueue, TaskScheduler};
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tasks::{Chore, Heartbeat};

/// デモの最大実行時間（全タスクが終わらなくてもここで打ち切る）
const DEMO_DEADLINE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shuttle_core=debug,shuttle_cli=info")),
        )
        .init();

    // (A) 設定: 引数に JSON ファイルがあれば読む
    let config = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::from_json_file(path)?,
        None => SchedulerConfig::default().with_poll_interval(Duration::from_millis(200)),
    };
    let poll_interval = config.poll_interval;

    // (B) キューにタスクを登録（数字が大きいほど優先）
    let queue = Arc::new(TaskQueue::new());
    queue
        .add(
            TaskProxy::before(Chore::new("login", 2), Chore::new("daily-quests", 3)),
            10,
        )
        .await;
    queue
        .add(
            TaskProxy::after(Chore::new("report", 1), Chore::new("collect-rewards", 2)),
            5,
        )
        .await;
    queue
        .add(
            TaskProxy::extra(Heartbeat::new(), Chore::new("expedition", 3)),
            1,
        )
        .await;

    // (C) スケジューラを起動
    let mut scheduler = TaskScheduler::builder()
        .config(config)
        .queue(Arc::clone(&queue))
        .build()?;
    scheduler.start()?;
    info!(%scheduler, "demo running");

    // (D) 実行中に優先度の高いタスクを割り込ませる（login のゲートは再実行される）
    sleep(poll_interval * 3).await;
    let urgent = queue.add(TaskHandle::new(Chore::new("urgent-mail", 1)), 100).await;
    info!(task = %urgent.id(), "urgent task added");

    // (E) 一時停止 → 再開
    sleep(poll_interval * 2).await;
    scheduler.pause()?;
    sleep(poll_interval * 3).await;
    scheduler.resume()?;

    // (F) 完了をポーリングで待つ
    let deadline = tokio::time::Instant::now() + DEMO_DEADLINE;
    while queue.counts().await.incomplete() > 0 && tokio::time::Instant::now() < deadline {
        sleep(poll_interval).await;
    }

    // stop() は全タスクをリセットするので、その前にスナップショットを取る
    let snapshot = queue.snapshot().await;
    println!("{}", snapshot.to_json()?);
    info!(counts = ?snapshot.counts(), "final counts");

    scheduler.stop().await;
    info!(queue = %queue.describe().await, "demo finished");
    Ok(())
}
