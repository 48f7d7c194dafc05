use crate::config::profile::Profile;
use crate::config::properties::{
    PropertiesStore, BACKUP, BACKUP_DIRECTORY_ENABLED, BACKUP_FREQUENCY, BACKUP_PARTITION,
    BACKUP_PARTITION_ENABLED, BACKUP_SCREENSHOT, BACKUP_SOURCE, EXCHANGE_ACCESS, KDE_LOCK,
    SHOW_READ_ONLY_INFO, SHOW_WELCOME,
};
use crate::error::Result;
use crate::pipeline::{Task, TaskContext};
use async_trait::async_trait;
use std::sync::Mutex;

/// 소유한 키들을 속성 파일에 기록하는 작업
///
/// 항상 파이프라인의 마지막에 두어 앞의 작업들이 성공한 뒤에만
/// 영속화되게 합니다. 독립적이고 파괴적이지 않으므로 실패해도
/// 파이프라인 전체를 실패로 만들지 않습니다 (기록만 남김).
pub struct PropertiesTask {
    store: Mutex<PropertiesStore>,
    profile: Profile,
}

impl PropertiesTask {
    pub fn new(store: PropertiesStore, profile: Profile) -> Self {
        Self {
            store: Mutex::new(store),
            profile,
        }
    }
}

#[async_trait]
impl Task for PropertiesTask {
    fn id(&self) -> &str {
        "properties"
    }

    fn title(&self) -> &str {
        "Settings"
    }

    fn message(&self) -> &str {
        "Saving settings..."
    }

    fn tolerate_failure(&self) -> bool {
        true
    }

    async fn run(&self, _ctx: &TaskContext<'_>) -> Result<()> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| crate::error::FirstbootError::ConfigError(
                "properties store poisoned".to_string(),
            ))?;

        let system = &self.profile.system;
        store.set_bool(SHOW_WELCOME, system.show_welcome);
        store.set_bool(SHOW_READ_ONLY_INFO, system.show_read_only_info);
        store.set_bool(EXCHANGE_ACCESS, system.exchange_access);
        store.set_bool(KDE_LOCK, system.kde_lock);

        let backup = &self.profile.backup;
        store.set_bool(BACKUP, backup.enabled);
        store.set(BACKUP_SOURCE, &backup.source);
        store.set_bool(BACKUP_DIRECTORY_ENABLED, backup.destination.is_some());
        store.set_bool(BACKUP_PARTITION_ENABLED, backup.partition.is_some());
        if let Some(partition) = &backup.partition {
            store.set(BACKUP_PARTITION, partition);
        }
        store.set_bool(BACKUP_SCREENSHOT, backup.screenshot);
        store.set(BACKUP_FREQUENCY, &backup.frequency_minutes.to_string());

        store.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::runner::test_support::ScriptedExecutor;
    use crate::pipeline::progress::test_support::CollectingSink;
    use crate::pipeline::TaskProgress;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    static TEST_FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_properties_path() -> PathBuf {
        let seq = TEST_FILE_SEQ.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "firstboot-propstask-test-{}-{}",
            std::process::id(),
            seq
        ))
    }

    #[tokio::test]
    async fn test_persists_owned_keys() {
        let path = temp_properties_path();
        std::fs::write(&path, "OtherTool=untouched\n").unwrap();

        let store = PropertiesStore::load(&path).unwrap();
        let mut profile = Profile::default();
        profile.backup.enabled = true;
        profile.backup.frequency_minutes = 10;
        profile.system.show_welcome = true;

        let task = PropertiesTask::new(store, profile);
        let executor = ScriptedExecutor::always_ok();
        let sink = Arc::new(CollectingSink::default());
        let progress = TaskProgress::new(sink, 0, 1);
        let ctx = TaskContext {
            executor: &executor,
            progress: &progress,
        };

        task.run(&ctx).await.unwrap();

        let reloaded = PropertiesStore::load(&path).unwrap();
        assert_eq!(reloaded.get("OtherTool"), Some("untouched"));
        assert_eq!(reloaded.get(BACKUP), Some("true"));
        assert_eq!(reloaded.get(BACKUP_FREQUENCY), Some("10"));
        assert_eq!(reloaded.get(SHOW_WELCOME), Some("true"));
        // 외부 프로세스는 전혀 쓰지 않음
        assert!(executor.calls().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failure_is_tolerated_by_pipeline_policy() {
        let store = PropertiesStore::load(temp_properties_path()).unwrap();
        let task = PropertiesTask::new(store, Profile::default());
        assert!(task.tolerate_failure());
    }
}
