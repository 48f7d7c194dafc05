use crate::error::{FirstbootError, Result};
use async_trait::async_trait;
use tokio::process::Command;

/// 실행할 외부 명령어
///
/// 설치/방화벽/부트로더/패스워드 작업이 모두 이 하나의 계약으로 외부
/// 프로세스를 실행합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalCommand {
    /// 프로그램 + 인자 목록으로 직접 실행
    Argv { program: String, args: Vec<String> },
    /// 쉘 스크립트로 실행 (bash -c)
    Script(String),
}

impl ExternalCommand {
    pub fn argv(program: &str, args: &[&str]) -> Self {
        Self::Argv {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn script(script: impl Into<String>) -> Self {
        Self::Script(script.into())
    }

    /// 로그/디버그 출력용 한 줄 표현
    pub fn display_line(&self) -> String {
        match self {
            Self::Argv { program, args } => {
                let mut line = program.clone();
                for arg in args {
                    line.push(' ');
                    line.push_str(arg);
                }
                line
            }
            Self::Script(script) => script.lines().next().unwrap_or("").to_string(),
        }
    }
}

/// 외부 명령어 실행 결과
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout과 stderr를 합쳐 진단용 출력으로 반환
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// 종료 코드가 0이 아니면 캡처된 출력을 담은 에러로 변환
    pub fn succeed(self) -> Result<CommandOutput> {
        if self.success() {
            Ok(self)
        } else {
            Err(FirstbootError::Command {
                exit_code: self.exit_code,
                output: self.combined(),
            })
        }
    }
}

/// 외부 프로세스 실행 trait
///
/// 테스트에서는 가짜 실행기를 꽂아 외부 프로세스 없이 파이프라인을
/// 검증합니다.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// 명령어를 동기적으로 실행하고 종료 코드와 출력을 캡처
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput>;
}

/// tokio::process 기반 실행기
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for ShellRunner {
    async fn run(&self, command: &ExternalCommand) -> Result<CommandOutput> {
        let output = match command {
            ExternalCommand::Argv { program, args } => Command::new(program)
                .args(args)
                .output()
                .await
                .map_err(|e| FirstbootError::ExecutionError(e.to_string()))?,
            ExternalCommand::Script(script) => Command::new("bash")
                .arg("-c")
                .arg(script)
                .output()
                .await
                .map_err(|e| FirstbootError::ExecutionError(e.to_string()))?,
        };

        Ok(CommandOutput {
            // 시그널로 종료된 경우 코드가 없으므로 -1로 취급
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
