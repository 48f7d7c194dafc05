use crate::config::Profile;
use crate::error::{FirstbootError, Result};
use crate::install::InstallBatch;
use colored::*;
use dialoguer::Confirm;

pub struct ConfirmPrompt;

impl ConfirmPrompt {
    pub fn new() -> Self {
        Self
    }

    /// 적용 전에 무엇이 실행될지 요약하고 확인을 받음
    pub fn confirm_apply(&self, profile: &Profile, batch: &InstallBatch) -> Result<bool> {
        eprintln!("\n{}", "[>] About to apply:".cyan().bold());

        if !profile.firewall.rules.is_empty() {
            eprintln!(
                "  {} firewall rules",
                profile.firewall.rules.len().to_string().bold()
            );
        }
        if !batch.is_empty() {
            eprintln!(
                "  {} packages in {} feature groups",
                batch.total_packages().to_string().bold(),
                batch.groups().count()
            );
            if let Some(proxy) = &profile.proxy {
                eprintln!("  apt proxy {}", proxy.host.yellow());
            }
        }
        if profile.backup.enabled {
            eprintln!("  backup from {}", profile.backup.source.yellow());
        }
        if profile.bootloader.update {
            eprintln!("  bootloader update");
        }
        if profile.password.is_some() {
            eprintln!("  {}", "user password change".yellow());
        }

        let result = Confirm::new()
            .with_prompt("Apply this configuration?")
            .default(false)
            .interact()
            .map_err(|_| FirstbootError::UserCancelled)?;

        Ok(result)
    }
}

impl Default for ConfirmPrompt {
    fn default() -> Self {
        Self::new()
    }
}
