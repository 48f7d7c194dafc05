pub mod progress;
pub mod task;

pub use progress::{ProgressSink, TaskProgress};
pub use task::{Task, TaskContext, TaskReport, TaskState};

use crate::error::FirstbootError;
use crate::executor::CommandExecutor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// 파이프라인 전체 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl Default for PipelineState {
    /// 아직 시작하지 않은 파이프라인의 상태
    fn default() -> Self {
        PipelineState::Idle
    }
}

/// 파이프라인 종료 결과
#[derive(Debug)]
pub struct PipelineResult {
    pub state: PipelineState,
    pub reports: Vec<TaskReport>,
    /// fail-fast로 중단시킨 에러. 관용(tolerate) 작업의 실패는 여기가
    /// 아니라 해당 TaskReport에 기록됩니다.
    pub error: Option<FirstbootError>,
}

/// 작업 경계에서만 확인하는 협조적 취소 토큰
///
/// 외부 프로세스는 안전하게 중단할 수 없으므로 실행 중인 작업은
/// 절대 끊지 않고, 다음 작업을 시작하기 전에만 취소를 반영합니다.
#[derive(Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// 순차 실행 파이프라인
///
/// 작업들은 추가된 순서 그대로, 백그라운드 워커 하나에서 실행됩니다.
/// 뒤의 작업이 앞의 작업이 만든 파일시스템 상태에 의존할 수 있으므로
/// 재정렬이나 병렬화는 하지 않습니다.
pub struct TaskPipeline {
    tasks: Vec<Box<dyn Task>>,
    executor: Arc<dyn CommandExecutor>,
}

impl TaskPipeline {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            tasks: Vec::new(),
            executor,
        }
    }

    /// 작업 추가 (추가 순서 = 실행 순서)
    pub fn add_task(&mut self, task: Box<dyn Task>) {
        self.tasks.push(task);
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// 백그라운드 워커에서 파이프라인 실행 시작
    ///
    /// 호출자 스레드는 블록되지 않고, 진행 상황은 sink 콜백으로만
    /// 전달됩니다.
    pub fn spawn(self, sink: Arc<dyn ProgressSink>) -> PipelineHandle {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let join = tokio::spawn(async move { self.run_worker(sink, worker_cancel).await });
        PipelineHandle { cancel, join }
    }

    async fn run_worker(self, sink: Arc<dyn ProgressSink>, cancel: CancelToken) -> PipelineResult {
        let total = self.tasks.len();
        let mut reports: Vec<TaskReport> = self
            .tasks
            .iter()
            .map(|t| TaskReport::pending(t.as_ref()))
            .collect();
        let mut state = PipelineState::Running;
        let mut fatal: Option<FirstbootError> = None;

        for (index, task) in self.tasks.iter().enumerate() {
            // 취소는 작업 경계에서만 반영
            if cancel.is_cancelled() {
                for report in reports.iter_mut().skip(index) {
                    report.state = TaskState::Cancelled;
                }
                state = PipelineState::Cancelled;
                break;
            }

            sink.on_title(task.title());
            sink.on_message(task.message());

            let progress = TaskProgress::new(Arc::clone(&sink), index, total);
            progress.report(0.0);

            reports[index].state = TaskState::Running;
            let started = Instant::now();
            let ctx = TaskContext {
                executor: self.executor.as_ref(),
                progress: &progress,
            };

            match task.run(&ctx).await {
                Ok(()) => {
                    reports[index].state = TaskState::Succeeded;
                    reports[index].duration_ms = started.elapsed().as_millis();
                    progress.report(1.0);
                }
                Err(e) => {
                    let err = e.in_task(task.id());
                    reports[index].state = TaskState::Failed;
                    reports[index].error = Some(err.to_string());
                    reports[index].duration_ms = started.elapsed().as_millis();

                    if !task.tolerate_failure() {
                        fatal = Some(err);
                        state = PipelineState::Failed;
                        break;
                    }
                    // 관용 작업의 실패는 기록만 하고 계속 진행
                }
            }
        }

        if state == PipelineState::Running {
            state = PipelineState::Completed;
        }

        let result = PipelineResult {
            state,
            reports,
            error: fatal,
        };
        sink.on_done(&result);
        result
    }
}

/// 실행 중인 파이프라인에 대한 핸들
pub struct PipelineHandle {
    cancel: CancelToken,
    join: JoinHandle<PipelineResult>,
}

impl PipelineHandle {
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 종료까지 대기하고 결과 반환
    pub async fn wait(self) -> crate::error::Result<PipelineResult> {
        self.join
            .await
            .map_err(|e| FirstbootError::ExecutionError(format!("pipeline worker panicked: {e}")))
    }
}
