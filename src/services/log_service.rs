use chrono::Utc;
use tokio::sync::Mutex;

use crate::db::LogStore;
use crate::dto::{DashboardCard, DashboardResponse};
use crate::error::{AppError, AppResult, StorageError};
use crate::models::daily_log::{LogEntry, NewLogEntry};

pub const STORAGE_UNAVAILABLE_MESSAGE: &str = "LocalStorage is not available. Cannot save log.";

/// Save, list and latest-entry retrieval over a [`LogStore`].
///
/// Saves are read-modify-write over the whole collection. They are
/// serialized through `write_lock` so two concurrent saves through the same
/// service cannot overwrite each other. Store access runs on the blocking
/// pool since backends may touch the filesystem.
pub struct LogService {
    store: LogStore,
    write_lock: Mutex<()>,
}

impl LogService {
    pub fn new(store: LogStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// True when the backend exists and answers a read.
    pub async fn storage_ready(&self) -> bool {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.probe())
            .await
            .unwrap_or(false)
    }

    /// Stamp the entry with the current time and append it.
    pub async fn save_log(&self, draft: NewLogEntry) -> AppResult<LogEntry> {
        if !self.store.is_available() {
            return Err(AppError::StorageUnavailable(
                STORAGE_UNAVAILABLE_MESSAGE.to_string(),
            ));
        }

        let _guard = self.write_lock.lock().await;

        let store = self.store.clone();
        let (entry, total) = tokio::task::spawn_blocking(move || {
            let mut logs = store.read();
            let entry = draft.stamp(Utc::now());
            logs.push(entry.clone());
            store.write(&logs)?;
            Ok::<_, StorageError>((entry, logs.len()))
        })
        .await
        .map_err(anyhow::Error::from)??;

        tracing::info!(
            mood = %entry.mood,
            emotions = %entry.emotions,
            sensory_issues = %entry.sensory_issues,
            total,
            "Daily log saved"
        );
        Ok(entry)
    }

    /// All entries in insertion order. Empty when storage is unavailable.
    pub async fn get_logs(&self) -> Vec<LogEntry> {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.read()).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Log read task failed");
                Vec::new()
            }
        }
    }

    /// The last appended entry.
    pub async fn get_latest_log(&self) -> Option<LogEntry> {
        self.get_logs().await.pop()
    }

    pub async fn dashboard(&self) -> DashboardResponse {
        let latest = self.get_latest_log().await;

        let cards = vec![
            DashboardCard::new("Dagens Humør", latest.as_ref().map(|e| e.mood.to_string())),
            DashboardCard::new(
                "Sensoriske Utfordringer",
                latest.as_ref().map(|e| e.sensory_issues.to_string()),
            ),
            DashboardCard::new(
                "Emosjonell Status",
                latest.as_ref().map(|e| e.emotions.to_string()),
            ),
        ];

        DashboardResponse { cards, latest }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{KeyValueStorage, MemoryStorage};
    use crate::dto::NO_ENTRIES_TEXT;
    use crate::models::daily_log::{Emotion, Mood, SensoryIssue};
    use chrono::SubsecRound;
    use std::io;
    use std::sync::Arc;

    /// Reads succeed, every write fails.
    struct ReadOnlyStorage;

    impl KeyValueStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "read-only"
        }
    }

    fn service() -> LogService {
        LogService::new(LogStore::new(
            Arc::new(MemoryStorage::new()),
            LogStore::DEFAULT_KEY,
        ))
    }

    fn draft(notes: &str) -> NewLogEntry {
        NewLogEntry {
            mood: Mood::Glad,
            emotions: Emotion::Fornoyd,
            sensory_issues: SensoryIssue::Lys,
            notes: notes.into(),
        }
    }

    #[tokio::test]
    async fn saved_entry_is_latest_with_timestamp_in_call_window() {
        let service = service();
        let before = Utc::now().trunc_subsecs(3);
        service.save_log(draft("Fin dag")).await.unwrap();
        let after = Utc::now();

        let latest = service.get_latest_log().await.unwrap();
        assert_eq!(latest.draft(), draft("Fin dag"));
        let stamped = latest.timestamp.unwrap();
        assert!(stamped >= before);
        assert!(stamped <= after);

        assert_eq!(service.get_logs().await, vec![latest]);
    }

    #[tokio::test]
    async fn sequential_saves_keep_call_order() {
        let service = service();
        for i in 0..5 {
            service.save_log(draft(&format!("entry {i}"))).await.unwrap();
        }

        let logs = service.get_logs().await;
        let notes: Vec<&str> = logs.iter().map(|e| e.notes.as_str()).collect();
        assert_eq!(notes, ["entry 0", "entry 1", "entry 2", "entry 3", "entry 4"]);
        assert!(logs.iter().all(|e| e.timestamp.is_some()));
        assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(service.get_latest_log().await.unwrap().notes, "entry 4");
    }

    #[tokio::test]
    async fn repeated_reads_return_the_same_sequence() {
        let service = service();
        service.save_log(draft("A")).await.unwrap();
        service.save_log(draft("B")).await.unwrap();

        let first = service.get_logs().await;
        assert_eq!(service.get_logs().await, first);
        assert_eq!(service.get_logs().await, first);
    }

    #[tokio::test]
    async fn empty_store_has_no_latest_entry() {
        let service = service();
        assert!(service.get_logs().await.is_empty());
        assert!(service.get_latest_log().await.is_none());
    }

    #[tokio::test]
    async fn unavailable_storage_fails_saves_but_not_reads() {
        let service = LogService::new(LogStore::unavailable(LogStore::DEFAULT_KEY));

        let err = service.save_log(draft("x")).await.unwrap_err();
        assert!(matches!(err, AppError::StorageUnavailable(ref msg) if msg == STORAGE_UNAVAILABLE_MESSAGE));
        assert!(service.get_logs().await.is_empty());
        assert!(service.get_latest_log().await.is_none());
    }

    #[tokio::test]
    async fn corrupt_collection_is_replaced_on_next_save() {
        let backend = Arc::new(MemoryStorage::new());
        backend.set_item("dailyLogs", "garbage").unwrap();
        let service = LogService::new(LogStore::new(backend, LogStore::DEFAULT_KEY));

        assert!(service.get_latest_log().await.is_none());
        service.save_log(draft("fresh")).await.unwrap();
        assert_eq!(service.get_logs().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_write_is_a_storage_error_and_keeps_nothing() {
        let service = LogService::new(LogStore::new(
            Arc::new(ReadOnlyStorage),
            LogStore::DEFAULT_KEY,
        ));
        assert!(service.storage_ready().await);

        let err = service.save_log(draft("x")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(StorageError::Io(_))));
        assert!(service.get_logs().await.is_empty());
        assert!(service.get_latest_log().await.is_none());
    }

    #[tokio::test]
    async fn entries_without_timestamp_survive_a_save() {
        let backend = Arc::new(MemoryStorage::new());
        backend
            .set_item(
                "dailyLogs",
                r#"[{"mood":"Trist","emotions":"Redd","sensoryIssues":"Lukt","notes":"gammel"}]"#,
            )
            .unwrap();
        let service = LogService::new(LogStore::new(backend.clone(), LogStore::DEFAULT_KEY));

        service.save_log(draft("ny")).await.unwrap();

        let logs = service.get_logs().await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].notes, "gammel");
        assert_eq!(logs[0].timestamp, None);
        assert!(logs[1].timestamp.is_some());

        let raw = backend.get_item("dailyLogs").unwrap().unwrap();
        assert!(raw.starts_with(r#"[{"mood":"Trist","emotions":"Redd","sensoryIssues":"Lukt","notes":"gammel"}"#));
    }

    #[tokio::test]
    async fn concurrent_saves_lose_no_entries() {
        let service = Arc::new(service());
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.save_log(draft(&format!("n{i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.get_logs().await.len(), 20);
    }

    #[tokio::test]
    async fn dashboard_reflects_latest_entry() {
        let service = service();
        let empty = service.dashboard().await;
        assert!(empty.latest.is_none());
        assert!(empty.cards.iter().all(|c| c.text == NO_ENTRIES_TEXT));

        service.save_log(draft("A")).await.unwrap();
        service
            .save_log(NewLogEntry {
                mood: Mood::Noytral,
                emotions: Emotion::Overveldet,
                sensory_issues: SensoryIssue::Stoy,
                notes: "B".into(),
            })
            .await
            .unwrap();

        let dashboard = service.dashboard().await;
        let texts: Vec<&str> = dashboard.cards.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["Nøytral", "Støy", "Overveldet"]);
        assert_eq!(dashboard.latest.unwrap().notes, "B");
    }
}
