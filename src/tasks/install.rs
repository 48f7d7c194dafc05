use crate::error::Result;
use crate::install::InstallBatch;
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// 설치 배치를 파이프라인 작업으로 감싸는 어댑터
///
/// 선택이 비어 있으면 이 작업은 파이프라인에 추가되지 않습니다
/// (`InstallBatch::is_empty` 참조).
pub struct InstallTask {
    batch: Mutex<InstallBatch>,
}

impl InstallTask {
    pub fn new(batch: InstallBatch) -> Self {
        Self {
            batch: Mutex::new(batch),
        }
    }
}

#[async_trait]
impl Task for InstallTask {
    fn id(&self) -> &str {
        "install"
    }

    fn title(&self) -> &str {
        "Software installation"
    }

    fn message(&self) -> &str {
        "Installing selected software..."
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()> {
        let mut batch = self.batch.lock().await;
        batch.run(ctx.executor, ctx.progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::runner::test_support::ScriptedExecutor;
    use crate::install::Selection;
    use crate::pipeline::progress::test_support::CollectingSink;
    use crate::pipeline::TaskProgress;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runs_underlying_batch() {
        let selection = Selection::new(["stellarium"]).unwrap();
        let task = InstallTask::new(InstallBatch::plan(&selection));

        let executor = ScriptedExecutor::always_ok();
        let sink = Arc::new(CollectingSink::default());
        let progress = TaskProgress::new(sink, 0, 1);
        let ctx = TaskContext {
            executor: &executor,
            progress: &progress,
        };

        task.run(&ctx).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].contains("apt-get update"));
        assert!(calls[1].contains("stellarium"));
    }
}
