use crate::config::profile::PasswordSection;
use crate::error::Result;
use crate::executor::ExternalCommand;
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;

/// chpasswd로 사용자 패스워드를 바꾸는 작업
pub struct PasswordTask {
    section: PasswordSection,
}

impl PasswordTask {
    pub fn new(section: PasswordSection) -> Self {
        Self { section }
    }

    fn script(&self) -> String {
        // 작은따옴표가 들어간 패스워드도 안전하게 전달
        let entry = format!("{}:{}", self.section.user, self.section.password);
        format!("echo '{}' | chpasswd", entry.replace('\'', r"'\''"))
    }
}

#[async_trait]
impl Task for PasswordTask {
    fn id(&self) -> &str {
        "password"
    }

    fn title(&self) -> &str {
        "User password"
    }

    fn message(&self) -> &str {
        "Changing user password..."
    }

    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()> {
        ctx.executor
            .run(&ExternalCommand::script(self.script()))
            .await?
            .succeed()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_pipes_into_chpasswd() {
        let task = PasswordTask::new(PasswordSection {
            user: "user".to_string(),
            password: "s3cret".to_string(),
        });
        assert_eq!(task.script(), "echo 'user:s3cret' | chpasswd");
    }

    #[test]
    fn test_script_escapes_single_quotes() {
        let task = PasswordTask::new(PasswordSection {
            user: "user".to_string(),
            password: "pa'ss".to_string(),
        });
        assert!(task.script().contains(r"'\''"));
    }
}
