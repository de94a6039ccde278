use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use practice_core::AnswerRecord;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Keys of the string-valued progress store.
///
/// Every value is stored as a string: the level and daily progress are
/// stringified integers, the last practice date is a `YYYY-MM-DD` stamp
/// compared by exact equality, and the notification permission holds the
/// `"granted"` literal when reminders were enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    Level,
    DailyProgress,
    LastPracticeDate,
    NotificationPermission,
}

impl ProgressKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressKey::Level => "multiplicationLevel",
            ProgressKey::DailyProgress => "dailyProgress",
            ProgressKey::LastPracticeDate => "lastPracticeDate",
            ProgressKey::NotificationPermission => "notificationPermission",
        }
    }
}

/// Repository contract for the string-valued progress store.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a stored value, `None` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError>;

    /// Store or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: ProgressKey, value: &str) -> Result<(), StorageError>;
}

/// Repository contract for the durable offline queue.
///
/// The queue persists as one JSON array of `AnswerRecord` with
/// overwrite-whole-value semantics, mirroring how the recorder rewrites the
/// entire pending queue on every append.
#[async_trait]
pub trait OfflineQueueRepository: Send + Sync {
    /// Load the persisted queue, empty when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the queue cannot be read or decoded.
    async fn load(&self) -> Result<Vec<AnswerRecord>, StorageError>;

    /// Overwrite the persisted queue with the given entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the queue cannot be encoded or stored.
    async fn replace(&self, entries: &[AnswerRecord]) -> Result<(), StorageError>;

    /// Drop the persisted queue entirely.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the queue cannot be cleared.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<ProgressKey, String>>>,
    queue: Arc<Mutex<Vec<AnswerRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            progress: Arc::new(Mutex::new(HashMap::new())),
            queue: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get(&self, key: ProgressKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn set(&self, key: ProgressKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_owned());
        Ok(())
    }
}

#[async_trait]
impl OfflineQueueRepository for InMemoryRepository {
    async fn load(&self) -> Result<Vec<AnswerRecord>, StorageError> {
        let guard = self
            .queue
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn replace(&self, entries: &[AnswerRecord]) -> Result<(), StorageError> {
        let mut guard = self
            .queue
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = entries.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .queue
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clear();
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub offline_queue: Arc<dyn OfflineQueueRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let offline_queue: Arc<dyn OfflineQueueRepository> = Arc::new(repo);
        Self {
            progress,
            offline_queue,
        }
    }
}
