use crate::pipeline::{PipelineResult, PipelineState, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 스피너 스타일 (감시 모드 대기 표시용)
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// 파이프라인 진행률 바 스타일
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {percent}% {wide_msg}")
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// ProgressSink의 터미널 구현
///
/// 코어 파이프라인은 이 구현을 모른 채 콜백만 호출합니다.
pub struct CliProgressSink {
    bar: ProgressBar,
}

impl CliProgressSink {
    pub fn new() -> Self {
        Self {
            bar: create_progress_bar(100),
        }
    }
}

impl Default for CliProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for CliProgressSink {
    fn on_title(&self, title: &str) {
        self.bar.println(format!("• {}", title));
    }

    fn on_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn on_progress(&self, fraction: f64) {
        self.bar.set_position((fraction * 100.0).round() as u64);
    }

    fn on_done(&self, result: &PipelineResult) {
        match result.state {
            PipelineState::Completed => self.bar.finish_with_message("done"),
            PipelineState::Cancelled => self.bar.abandon_with_message("cancelled"),
            _ => self.bar.abandon_with_message("failed"),
        }
    }
}
