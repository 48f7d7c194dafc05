use crate::pipeline::PipelineResult;
use std::sync::Arc;

/// 파이프라인 진행 상황을 받는 관찰자 인터페이스
///
/// 코어는 아무것도 그리지 않습니다. CLI에서는 indicatif 기반 구현이,
/// 테스트에서는 수집용 구현이 이 trait을 구현합니다.
pub trait ProgressSink: Send + Sync {
    /// 현재 작업의 제목
    fn on_title(&self, title: &str);

    /// 현재 작업의 사람용 메시지
    fn on_message(&self, message: &str);

    /// 전체 진행률 (0.0 ~ 1.0)
    fn on_progress(&self, fraction: f64);

    /// 파이프라인 종료 결과
    fn on_done(&self, result: &PipelineResult);
}

/// 작업 하나의 0..1 진행률을 전체 진행률로 환산하는 핸들
///
/// 각 작업은 내부 단위 수와 무관하게 정확히 한 유닛을 차지합니다.
/// 전체 진행률 = (완료된 유닛 수 + 현재 작업의 진행률) / 총 유닛 수
#[derive(Clone)]
pub struct TaskProgress {
    sink: Arc<dyn ProgressSink>,
    done_units: usize,
    total_units: usize,
}

impl TaskProgress {
    pub fn new(sink: Arc<dyn ProgressSink>, done_units: usize, total_units: usize) -> Self {
        Self {
            sink,
            done_units,
            total_units,
        }
    }

    /// 현재 작업 내부의 진행률(0..1)을 보고
    pub fn report(&self, fraction: f64) {
        if self.total_units == 0 {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        let overall = (self.done_units as f64 + fraction) / self.total_units as f64;
        self.sink.on_progress(overall);
    }

    /// 작업 도중 메시지 갱신
    pub fn message(&self, message: &str) {
        self.sink.on_message(message);
    }
}
