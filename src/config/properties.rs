use crate::error::Result;
use std::fs;
use std::path::PathBuf;

/// 환영 설정이 기본으로 저장되는 위치
pub const DEFAULT_PROPERTIES_PATH: &str = "/etc/lernstickWelcome";

// 이 도구가 소유하는 키들. 파일에 있는 그 밖의 키는 건드리지 않습니다.
pub const SHOW_WELCOME: &str = "ShowWelcome";
pub const SHOW_READ_ONLY_INFO: &str = "ShowReadOnlyInfo";
pub const BACKUP: &str = "Backup";
pub const BACKUP_SOURCE: &str = "BackupSource";
pub const BACKUP_DIRECTORY_ENABLED: &str = "BackupDirectoryEnabled";
pub const BACKUP_PARTITION_ENABLED: &str = "BackupPartitionEnabled";
pub const BACKUP_PARTITION: &str = "BackupPartition";
pub const BACKUP_SCREENSHOT: &str = "BackupScreenshot";
pub const BACKUP_FREQUENCY: &str = "BackupFrequency";
pub const EXCHANGE_ACCESS: &str = "ExchangeAccess";
pub const KDE_LOCK: &str = "KdeLock";

#[derive(Debug, Clone)]
enum Line {
    /// 주석 또는 빈 줄, 원문 그대로 보존
    Verbatim(String),
    Pair { key: String, value: String },
}

/// 납작한 key=value 속성 파일
///
/// 시작할 때 읽고, 파이프라인의 마지막 작업만 씁니다. 저장할 때
/// 소유하지 않은 키와 주석, 줄 순서를 그대로 보존합니다.
#[derive(Debug, Clone)]
pub struct PropertiesStore {
    path: PathBuf,
    lines: Vec<Line>,
}

impl PropertiesStore {
    /// 파일에서 로드. 파일이 없으면 빈 저장소 (모두 기본값).
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                lines: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let lines = content
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    return Line::Verbatim(line.to_string());
                }
                match line.split_once('=') {
                    Some((key, value)) => Line::Pair {
                        key: key.trim().to_string(),
                        value: value.trim().to_string(),
                    },
                    None => Line::Verbatim(line.to_string()),
                }
            })
            .collect();

        Ok(Self { path, lines })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().rev().find_map(|line| match line {
            Line::Pair { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// "true"/"false" 값 읽기. 없거나 이상하면 기본값.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => value.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// 키 설정. 이미 있으면 제자리에서 갱신해 줄 순서를 보존하고,
    /// 없으면 끝에 추가합니다.
    pub fn set(&mut self, key: &str, value: &str) {
        for line in self.lines.iter_mut() {
            if let Line::Pair { key: k, value: v } = line {
                if k == key {
                    *v = value.to_string();
                    return;
                }
            }
        }
        self.lines.push(Line::Pair {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set(key, if value { "true" } else { "false" });
    }

    /// 파일로 저장
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Verbatim(text) => out.push_str(text),
                Line::Pair { key, value } => {
                    out.push_str(key);
                    out.push('=');
                    out.push_str(value);
                }
            }
            out.push('\n');
        }
        fs::write(&self.path, out)?;
        Ok(())
    }
}
