use crate::error::{FirstbootError, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// 기본 폴링 주기
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// squid 접근 로그에서 차단(TCP_DENIED/403)으로 기록되는 필드
const DENIED_MARKER: &str = "TCP_DENIED/403";

/// 한 줄에서 기대하는 최소 필드 수 (7번째 필드가 차단된 URL)
const MIN_FIELDS: usize = 7;

/// 차단된 사이트 이벤트. 같은 URL은 한 세션에 최대 한 번만 발생합니다.
#[derive(Debug, Clone, Serialize)]
pub struct DeniedSite {
    pub url: String,
    pub first_seen: DateTime<Local>,
}

/// 한 폴링 세션의 내부 상태
///
/// 소비한 줄 수는 단조 증가하고, seen 집합은 세션 동안 줄어들지
/// 않습니다.
struct TailState {
    path: PathBuf,
    consumed_lines: usize,
    last_modified: Option<SystemTime>,
    seen: HashSet<String>,
}

impl TailState {
    /// 파일의 현재 끝을 기준점으로 잡습니다. 시작 이전의 줄은 절대
    /// 이벤트로 나가지 않습니다.
    fn baseline(path: &Path) -> Self {
        let consumed_lines = match File::open(path) {
            Ok(file) => BufReader::new(file).lines().count(),
            Err(_) => 0,
        };
        let last_modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok();

        Self {
            path: path.to_path_buf(),
            consumed_lines,
            last_modified,
            seen: HashSet::new(),
        }
    }

    /// 한 사이클 폴링: 수정 시각이 그대로면 파일을 읽지 않습니다.
    /// 열기 실패는 이번 사이클만 건너뛰고 다음 주기에 재시도합니다.
    fn poll(&mut self) -> Vec<DeniedSite> {
        let modified = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(_) => return Vec::new(),
        };
        if self.last_modified == Some(modified) {
            return Vec::new();
        }
        self.last_modified = Some(modified);

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        let mut events = Vec::new();
        for line in BufReader::new(file)
            .lines()
            .skip(self.consumed_lines)
            .map_while(|l| l.ok())
        {
            self.consumed_lines += 1;
            if let Some(url) = parse_denied_line(&line) {
                if self.seen.insert(url.to_string()) {
                    events.push(DeniedSite {
                        url: url.to_string(),
                        first_seen: Local::now(),
                    });
                }
            }
        }
        events
    }
}

/// 접근 로그 한 줄 파싱. 필드가 모자라는 줄은 조용히 건너뜁니다.
fn parse_denied_line(line: &str) -> Option<&str> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }
    if fields[3] == DENIED_MARKER {
        Some(fields[6])
    } else {
        None
    }
}

/// 추가 전용 로그 파일을 폴링해서 새로 차단된 사이트를 중복 없이
/// 내보내는 감시기
///
/// 시험 환경 세션마다 하나 만들어 start/stop으로 수명을 관리합니다.
pub struct AccessLogWatcher {
    path: PathBuf,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl AccessLogWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval: POLL_INTERVAL,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// 감시 시작. 이미 실행 중이면 에러입니다.
    pub fn start(&self) -> Result<WatcherHandle> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(FirstbootError::WatcherState(
                "watcher is already running".to_string(),
            ));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let running = Arc::clone(&self.running);
        let interval = self.interval;
        // 기준점은 start가 돌아오기 전에 잡는다. start 이후에 추가된
        // 줄만 이벤트가 된다는 보장이 여기서 나옵니다.
        let mut state = TailState::baseline(&self.path);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            while running.load(Ordering::SeqCst) {
                ticker.tick().await;
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                for event in state.poll() {
                    if tx.send(event).is_err() {
                        // 수신자가 사라지면 더 돌 이유가 없음
                        running.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
        });

        Ok(WatcherHandle { events: rx, join })
    }

    /// 감시 종료. 루프는 한 폴링 주기 안에 플래그를 보고 빠져나옵니다.
    /// 실행 중이 아니면 에러입니다.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(FirstbootError::WatcherState(
                "watcher is not running".to_string(),
            ));
        }
        Ok(())
    }
}

/// 실행 중인 감시기의 이벤트 수신 핸들
pub struct WatcherHandle {
    events: mpsc::UnboundedReceiver<DeniedSite>,
    join: JoinHandle<()>,
}

impl WatcherHandle {
    /// 다음 이벤트 수신. 감시기가 멈추고 채널이 비면 None.
    pub async fn recv(&mut self) -> Option<DeniedSite> {
        self.events.recv().await
    }

    /// 루프 종료까지 대기
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::AtomicUsize;

    static TEST_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_log_path() -> PathBuf {
        let seq = TEST_FILE_SEQ.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "firstboot-watcher-test-{}-{}.log",
            std::process::id(),
            seq
        ))
    }

    fn denied_line(url: &str) -> String {
        format!(
            "1500000000.123    45 10.0.2.15 {} 3612 GET {} - HIER_NONE/- text/html",
            DENIED_MARKER, url
        )
    }

    fn allowed_line(url: &str) -> String {
        format!(
            "1500000000.123    45 10.0.2.15 TCP_MISS/200 3612 GET {} - HIER_DIRECT/1.2.3.4 text/html",
            url
        )
    }

    /// 파일시스템 mtime 해상도보다 길게 기다려 수정 시각이 확실히
    /// 달라지게 함
    fn settle() {
        std::thread::sleep(Duration::from_millis(20));
    }

    fn append(path: &Path, line: &str) {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .unwrap();
        writeln!(file, "{}", line).unwrap();
    }

    #[test]
    fn test_parse_denied_line() {
        assert_eq!(
            parse_denied_line(&denied_line("http://example.com/")),
            Some("http://example.com/")
        );
        assert_eq!(parse_denied_line(&allowed_line("http://example.com/")), None);
    }

    #[test]
    fn test_parse_short_line_does_not_panic() {
        assert_eq!(parse_denied_line(""), None);
        assert_eq!(parse_denied_line("one two three"), None);
        assert_eq!(parse_denied_line("a b c TCP_DENIED/403"), None);
    }

    #[test]
    fn test_baseline_skips_historical_lines() {
        let path = temp_log_path();
        append(&path, &denied_line("http://old.example.com/"));

        let mut state = TailState::baseline(&path);
        settle();
        append(&path, &denied_line("http://new.example.com/"));

        let events = state.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].url, "http://new.example.com/");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_duplicate_url_emitted_once_across_cycles() {
        let path = temp_log_path();
        append(&path, "");
        let mut state = TailState::baseline(&path);

        settle();
        append(&path, &denied_line("http://example.com/"));
        let first = state.poll();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].url, "http://example.com/");

        settle();
        append(&path, &denied_line("http://example.com/"));
        let second = state.poll();
        assert!(second.is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_poll_survives_missing_file() {
        let path = temp_log_path();
        let mut state = TailState::baseline(&path);
        assert!(state.poll().is_empty());
    }

    #[test]
    fn test_consumed_lines_monotonic() {
        let path = temp_log_path();
        let mut state = TailState::baseline(&path);

        append(&path, &allowed_line("http://a.example.com/"));
        append(&path, &denied_line("http://b.example.com/"));
        state.poll();
        assert_eq!(state.consumed_lines, 2);

        settle();
        append(&path, "malformed");
        state.poll();
        assert_eq!(state.consumed_lines, 3);

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_start_while_running_is_an_error() {
        let watcher = AccessLogWatcher::new(temp_log_path());
        let _handle = watcher.start().unwrap();

        assert!(matches!(
            watcher.start(),
            Err(FirstbootError::WatcherState(_))
        ));

        watcher.stop().unwrap();
    }

    #[tokio::test]
    async fn test_stop_while_stopped_is_an_error() {
        let watcher = AccessLogWatcher::new(temp_log_path());
        assert!(matches!(
            watcher.stop(),
            Err(FirstbootError::WatcherState(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_terminates_loop_within_interval() {
        let watcher =
            AccessLogWatcher::new(temp_log_path()).with_interval(Duration::from_millis(10));
        let handle = watcher.start().unwrap();

        watcher.stop().unwrap();
        // stop 후 루프가 한 주기 안에 종료되어야 함
        tokio::time::timeout(Duration::from_secs(1), handle.join())
            .await
            .expect("watcher loop did not stop in time");
        assert!(!watcher.is_running());
    }

    #[tokio::test]
    async fn test_watcher_emits_new_denials() {
        let path = temp_log_path();
        append(&path, "");

        let watcher = AccessLogWatcher::new(&path).with_interval(Duration::from_millis(10));
        let mut handle = watcher.start().unwrap();

        settle();
        append(&path, &denied_line("http://blocked.example.com/"));

        let event = tokio::time::timeout(Duration::from_secs(2), handle.recv())
            .await
            .expect("no event within timeout")
            .expect("channel closed");
        assert_eq!(event.url, "http://blocked.example.com/");

        watcher.stop().unwrap();
        std::fs::remove_file(&path).unwrap();
    }
}
