use crate::config::Profile;
use crate::error::{FirstbootError, Result};
use colored::*;
use std::path::Path;

/// 프로파일의 방화벽 규칙과 설치 선택을 적용 없이 검사
pub fn execute_validate(profile_path: &Path) -> Result<()> {
    let profile = Profile::load(profile_path)?;

    let rules = profile.rule_set();
    if let Err(err) = rules.validate_all() {
        if let FirstbootError::Validation { column, row } = &err {
            // 어느 행의 어느 칸인지 바로 고칠 수 있게 출력
            eprintln!(
                "{} Rule {}: invalid {}",
                "[X]".red().bold(),
                (row + 1).to_string().bold(),
                column
            );
            if let Some(rule) = rules.get(*row) {
                eprintln!(
                    "    {} {} {}",
                    rule.protocol.as_str(),
                    rule.target.yellow(),
                    rule.port_range.yellow()
                );
            }
        }
        return Err(err);
    }

    let selection = profile.selection()?;

    eprintln!(
        "{} {} firewall rules, {} feature groups: all valid.",
        "[OK]".green().bold(),
        rules.len(),
        selection.len()
    );
    Ok(())
}
