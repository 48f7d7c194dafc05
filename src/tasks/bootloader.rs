use crate::config::profile::BootloaderSection;
use crate::error::Result;
use crate::executor::ExternalCommand;
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;

/// 부트 메뉴 타임아웃과 시스템 이름/버전을 갱신하는 작업
///
/// 실제 쓰기는 라이브 시스템의 부트로더 갱신 도구가 수행하며, 여기서는
/// 불투명한 외부 명령으로만 다룹니다. 같은 값으로 다시 실행하면 도구가
/// no-op으로 처리합니다.
pub struct BootloaderTask {
    section: BootloaderSection,
}

impl BootloaderTask {
    pub fn new(section: BootloaderSection) -> Self {
        Self { section }
    }

    fn command(&self) -> ExternalCommand {
        let mut args = vec![
            "--timeout".to_string(),
            self.section.timeout.to_string(),
            "--system-name".to_string(),
            self.section.system_name.clone(),
        ];
        if !self.section.system_version.is_empty() {
            args.push("--system-version".to_string());
            args.push(self.section.system_version.clone());
        }
        ExternalCommand::Argv {
            program: "lernstick-update-bootloader".to_string(),
            args,
        }
    }
}

#[async_trait]
impl Task for BootloaderTask {
    fn id(&self) -> &str {
        "bootloader"
    }

    fn title(&self) -> &str {
        "Bootloader"
    }

    fn message(&self) -> &str {
        "Updating boot menu..."
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()> {
        ctx.executor.run(&self.command()).await?.succeed()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::runner::test_support::ScriptedExecutor;
    use crate::pipeline::progress::test_support::CollectingSink;
    use crate::pipeline::TaskProgress;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_invokes_bootloader_tool_with_arguments() {
        let task = BootloaderTask::new(BootloaderSection {
            update: true,
            timeout: 5,
            system_name: "Exam Stick".to_string(),
            system_version: "2026-08".to_string(),
        });

        let executor = ScriptedExecutor::always_ok();
        let sink = Arc::new(CollectingSink::default());
        let progress = TaskProgress::new(sink, 0, 1);
        let ctx = TaskContext {
            executor: &executor,
            progress: &progress,
        };

        task.run(&ctx).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("lernstick-update-bootloader --timeout 5"));
        assert!(calls[0].contains("--system-name Exam Stick"));
        assert!(calls[0].contains("--system-version 2026-08"));
    }
}
