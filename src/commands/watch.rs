use crate::error::Result;
use crate::firewall::AccessLogWatcher;
use crate::ui::progress::create_spinner;
use colored::*;
use std::path::Path;

/// 접근 로그를 감시하며 새로 차단된 사이트를 한 번씩 출력
///
/// Ctrl-C로 멈출 때까지 돕니다. --json이면 줄 단위 JSON으로 출력해
/// 다른 도구로 파이프할 수 있습니다.
pub async fn execute_watch(log_path: &Path, json: bool) -> Result<()> {
    let watcher = AccessLogWatcher::new(log_path);
    let mut handle = watcher.start()?;

    let spinner = if json {
        None
    } else {
        eprintln!(
            "{} Watching {} (Ctrl-C to stop)",
            "[>>]".cyan().bold(),
            log_path.display()
        );
        Some(create_spinner("waiting for denied requests..."))
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = handle.recv() => {
                match event {
                    Some(denied) => {
                        if json {
                            println!("{}", serde_json::to_string(&denied)?);
                        } else if let Some(spinner) = &spinner {
                            spinner.println(format!(
                                "{} {}",
                                "[DENIED]".red().bold(),
                                denied.url
                            ));
                        }
                    }
                    None => break,
                }
            }
        }
    }

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    // 이벤트 채널이 먼저 닫혔으면 감시 루프는 이미 스스로 멈춘 상태
    if watcher.is_running() {
        watcher.stop()?;
    }
    handle.join().await;
    eprintln!("{} Watcher stopped.", "[BYE]".cyan());
    Ok(())
}
