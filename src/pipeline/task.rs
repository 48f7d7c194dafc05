use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::pipeline::progress::TaskProgress;
use async_trait::async_trait;

/// 파이프라인 작업 단위
///
/// 설치, 방화벽, 부트로더 등 이질적인 작업들을 하나의 trait으로 묶어
/// 파이프라인이 동일하게 다룹니다. 상속 계층 없이 trait 객체 목록
/// 하나면 충분합니다.
#[async_trait]
pub trait Task: Send + Sync {
    /// 작업 식별자 (에러 보고용)
    fn id(&self) -> &str;

    /// 작업 제목
    fn title(&self) -> &str;

    /// 작업 시작 시 표시할 메시지
    fn message(&self) -> &str {
        ""
    }

    /// 실패해도 파이프라인을 계속 진행할지 여부
    ///
    /// 기본은 fail-fast. 속성 저장처럼 독립적이고 파괴적이지 않은
    /// 작업만 명시적으로 true를 돌려줍니다.
    fn tolerate_failure(&self) -> bool {
        false
    }

    /// 작업 실행. 같은 입력으로 두 번 실행해도 안전해야 합니다.
    async fn run(&self, ctx: &TaskContext<'_>) -> Result<()>;
}

/// 작업에 전달되는 실행 컨텍스트
///
/// 전역 싱글톤 대신 실행기와 진행률 핸들을 명시적으로 전달합니다.
pub struct TaskContext<'a> {
    pub executor: &'a dyn CommandExecutor,
    pub progress: &'a TaskProgress,
}

/// 작업 상태. Pending → Running → {Succeeded|Failed|Cancelled} 순서로만
/// 전이하며 종결 상태에서 되돌아가지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// 작업 하나의 실행 기록
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub id: String,
    pub title: String,
    pub state: TaskState,
    pub error: Option<String>,
    pub duration_ms: u128,
}

impl TaskReport {
    pub fn pending(task: &dyn Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().to_string(),
            state: TaskState::Pending,
            error: None,
            duration_ms: 0,
        }
    }
}
