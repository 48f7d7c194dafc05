use crate::error::Result;
use crate::executor::ShellRunner;
use crate::install::{is_installed, FEATURE_GROUPS};
use colored::*;

/// 기능 그룹 카탈로그 출력. --installed면 dpkg로 설치 여부도 확인.
pub async fn execute_groups(check_installed: bool) -> Result<()> {
    let runner = ShellRunner::new();

    for group in FEATURE_GROUPS {
        let marker = if check_installed {
            // 설치 후 갱신 패스: 그룹의 모든 패키지가 있어야 설치로 봄
            match is_installed(&runner, group.packages).await {
                Ok(true) => "[v]".green().to_string(),
                Ok(false) => "[ ]".to_string(),
                Err(_) => "[?]".yellow().to_string(),
            }
        } else {
            "   ".to_string()
        };

        println!(
            "{} {} - {} ({} packages)",
            marker,
            group.name.bold(),
            group.label,
            group.packages.len()
        );
    }
    Ok(())
}
