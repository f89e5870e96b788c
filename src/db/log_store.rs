use std::sync::Arc;

use crate::db::storage::KeyValueStorage;
use crate::error::StorageError;
use crate::models::daily_log::LogEntry;

/// The whole entry collection, stored as one JSON array under a single key.
///
/// Reads never fail: a missing backend, a missing key, a backend error or an
/// unparseable value all read as an empty collection.
#[derive(Clone)]
pub struct LogStore {
    backend: Option<Arc<dyn KeyValueStorage>>,
    key: String,
}

impl LogStore {
    pub const DEFAULT_KEY: &'static str = "dailyLogs";

    pub fn new(backend: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            key: key.into(),
        }
    }

    /// A store with no storage behind it.
    pub fn unavailable(key: impl Into<String>) -> Self {
        Self {
            backend: None,
            key: key.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// True when the backend exists and answers a read.
    pub fn probe(&self) -> bool {
        match &self.backend {
            Some(backend) => backend.get_item(&self.key).is_ok(),
            None => false,
        }
    }

    pub fn read(&self) -> Vec<LogEntry> {
        let Some(backend) = &self.backend else {
            tracing::debug!(key = %self.key, "Storage unavailable, reading empty log collection");
            return Vec::new();
        };

        let raw = match backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, backend = backend.name(), error = %e, "Failed to read log collection");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<LogEntry>>(&raw) {
            Ok(entries) => {
                tracing::debug!(key = %self.key, count = entries.len(), "Read log collection");
                entries
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored log collection is not parseable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection. Does nothing when there is no backend.
    pub fn write(&self, entries: &[LogEntry]) -> Result<(), StorageError> {
        let Some(backend) = &self.backend else {
            tracing::debug!(key = %self.key, "Storage unavailable, log collection not stored");
            return Ok(());
        };

        let raw = serde_json::to_string(entries)?;
        backend.set_item(&self.key, &raw)?;
        tracing::debug!(key = %self.key, count = entries.len(), "Wrote log collection");
        Ok(())
    }
}
