use crate::error::Result;
use crate::executor::ExternalCommand;
use crate::firewall::FirewallRuleSet;
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;
use std::path::PathBuf;

/// 방화벽 데몬이 읽는 화이트리스트 파일
const WHITELIST_PATH: &str = "/etc/lernstick-firewall/net_whitelist";

/// 화이트리스트를 쓰고 방화벽 서비스를 재시작하는 작업
///
/// 검증을 통과한 규칙 사본만 받습니다. 호출자는 파이프라인을 만들기
/// 전에 `validate_all`을 통과시켜야 하고, 실행 중에는 원본을 더
/// 수정하지 않습니다. 같은 규칙으로 다시 실행해도 결과가 같으므로
/// 재실행에 안전합니다.
pub struct FirewallTask {
    rules: FirewallRuleSet,
    whitelist_path: PathBuf,
}

impl FirewallTask {
    pub fn new(rules: FirewallRuleSet) -> Self {
        Self {
            rules,
            whitelist_path: PathBuf::from(WHITELIST_PATH),
        }
    }

    pub fn with_whitelist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.whitelist_path = path.into();
        self
    }
}

#[async_trait]
impl Task for FirewallTask {
    fn id(&self) -> &str {
        "firewall"
    }

    fn title(&self) -> &str {
        "Firewall"
    }

    fn message(&self) -> &str {
        "Applying firewall rules..."
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()> {
        if let Some(parent) = self.whitelist_path.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.whitelist_path, self.rules.render()).await?;
        ctx.progress.report(0.5);

        ctx.executor
            .run(&ExternalCommand::argv(
                "systemctl",
                &["restart", "lernstick-firewall"],
            ))
            .await?
            .succeed()?;
        Ok(())
    }
}
