use thiserror::Error;

/// 방화벽 규칙 테이블에서 오류가 발생한 열
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleColumn {
    Target,
    PortRange,
}

impl std::fmt::Display for RuleColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleColumn::Target => write!(f, "target"),
            RuleColumn::PortRange => write!(f, "port range"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FirstbootError {
    #[error("Invalid {column} in firewall rule {}", .row + 1)]
    Validation { column: RuleColumn, row: usize },

    #[error("Command exited with status {exit_code}:\n{output}")]
    Command { exit_code: i32, output: String },

    #[error("Task '{task_id}' failed: {cause}")]
    Task {
        task_id: String,
        #[source]
        cause: Box<FirstbootError>,
    },

    #[error("Watcher state error: {0}")]
    WatcherState(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Command execution failed: {0}")]
    ExecutionError(String),

    #[error("User cancelled")]
    UserCancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FirstbootError {
    /// 작업 ID를 붙여 파이프라인 단위 에러로 감싸기
    pub fn in_task(self, task_id: &str) -> Self {
        FirstbootError::Task {
            task_id: task_id.to_string(),
            cause: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FirstbootError>;
