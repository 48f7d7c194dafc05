use crate::config::properties::DEFAULT_PROPERTIES_PATH;
use crate::config::{Profile, PropertiesStore};
use crate::error::{FirstbootError, Result};
use crate::executor::ShellRunner;
use crate::install::InstallBatch;
use crate::pipeline::{PipelineState, TaskPipeline};
use crate::tasks::{
    BackupTask, BootloaderTask, FirewallTask, InstallTask, PasswordTask, PropertiesTask,
};
use crate::ui::{CliProgressSink, ConfirmPrompt};
use colored::*;
use std::path::Path;
use std::sync::Arc;

/// 프로파일을 검증하고 구성 파이프라인 전체를 실행
pub async fn execute_apply(
    profile_path: &Path,
    properties_path: Option<&Path>,
    yes: bool,
) -> Result<()> {
    let profile = Profile::load(profile_path)?;

    // 파괴적인 작업 전에 검증부터. 유효하지 않은 방화벽 입력으로는
    // 파이프라인을 만들지 않습니다.
    let rules = profile.rule_set();
    rules.validate_all()?;
    let selection = profile.selection()?;
    let mut batch = InstallBatch::plan(&selection);
    if let Some(proxy) = &profile.proxy {
        batch = batch.with_proxy(proxy);
    }

    if !yes && !ConfirmPrompt::new().confirm_apply(&profile, &batch)? {
        eprintln!("{} Nothing applied.", "[BYE]".cyan());
        return Ok(());
    }

    let properties_path = properties_path.unwrap_or(Path::new(DEFAULT_PROPERTIES_PATH));
    let store = PropertiesStore::load(properties_path)?;

    let mut pipeline = TaskPipeline::new(Arc::new(ShellRunner::new()));
    if !rules.is_empty() {
        pipeline.add_task(Box::new(FirewallTask::new(rules)));
    }
    if !batch.is_empty() {
        // 빈 선택이면 설치 작업 자체를 넣지 않음
        pipeline.add_task(Box::new(InstallTask::new(batch)));
    }
    if profile.backup.enabled {
        pipeline.add_task(Box::new(BackupTask::new(profile.backup.clone())));
    }
    if profile.bootloader.update {
        pipeline.add_task(Box::new(BootloaderTask::new(profile.bootloader.clone())));
    }
    if let Some(password) = profile.password.clone() {
        pipeline.add_task(Box::new(PasswordTask::new(password)));
    }
    // 속성 저장은 항상 마지막: 앞의 작업들이 성공한 뒤에만 영속화
    pipeline.add_task(Box::new(PropertiesTask::new(store, profile)));

    eprintln!(
        "{} Running {} tasks...",
        "[>>]".cyan().bold(),
        pipeline.task_count().to_string().bold()
    );

    let sink = Arc::new(CliProgressSink::new());
    let handle = pipeline.spawn(sink);

    // Ctrl-C는 작업 경계에서만 반영되는 취소 요청으로 변환
    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!(
                "\n{} Cancelling after the current task finishes...",
                "[!]".yellow()
            );
            cancel.cancel();
        }
    });

    let result = handle.wait().await?;

    for report in &result.reports {
        if let Some(error) = &report.error {
            eprintln!("  {} {}: {}", "[X]".red(), report.title, error);
        }
    }

    match result.state {
        PipelineState::Completed => {
            eprintln!("{} Configuration applied.", "[OK]".green().bold());
            Ok(())
        }
        PipelineState::Cancelled => {
            eprintln!("{} Cancelled at a task boundary.", "[X]".yellow());
            Err(FirstbootError::UserCancelled)
        }
        _ => Err(result
            .error
            .unwrap_or_else(|| FirstbootError::ExecutionError("pipeline failed".to_string()))),
    }
}
