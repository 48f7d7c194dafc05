use crate::config::profile::BackupSection;
use crate::error::{FirstbootError, Result};
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;
use std::path::Path;

/// 교환 파티션의 기본 백업 대상 경로
const DEFAULT_DESTINATION: &str = "/media/exchange/backup";

/// 백업 디렉토리 준비 작업
///
/// 원본 디렉토리가 실제 디렉토리인지 확인하고, 대상 디렉토리가 없으면
/// 만듭니다. 둘 다 이미 준비된 상태에서 다시 실행해도 no-op입니다.
pub struct BackupTask {
    section: BackupSection,
}

impl BackupTask {
    pub fn new(section: BackupSection) -> Self {
        Self { section }
    }

    fn destination(&self) -> &str {
        self.section
            .destination
            .as_deref()
            .unwrap_or(DEFAULT_DESTINATION)
    }
}

#[async_trait]
impl Task for BackupTask {
    fn id(&self) -> &str {
        "backup"
    }

    fn title(&self) -> &str {
        "Backup"
    }

    fn message(&self) -> &str {
        "Preparing backup directories..."
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()> {
        let source = Path::new(&self.section.source);
        match tokio::fs::metadata(source).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(FirstbootError::ConfigError(format!(
                    "backup source {} is not a directory",
                    source.display()
                )))
            }
            Err(_) => {
                return Err(FirstbootError::ConfigError(format!(
                    "backup source {} does not exist",
                    source.display()
                )))
            }
        }
        ctx.progress.report(0.5);

        let destination = Path::new(self.destination());
        if !destination.exists() {
            tokio::fs::create_dir_all(destination).await?;
        } else if !tokio::fs::metadata(destination).await?.is_dir() {
            return Err(FirstbootError::ConfigError(format!(
                "backup destination {} is not a directory",
                destination.display()
            )));
        }

        Ok(())
    }
}
