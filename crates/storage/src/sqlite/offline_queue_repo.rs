use async_trait::async_trait;
use sqlx::Row;

use practice_core::AnswerRecord;

use crate::repository::{OfflineQueueRepository, StorageError};

use super::SqliteRepository;

// The queue lives in one row as a JSON array; every write replaces the
// whole payload.
#[async_trait]
impl OfflineQueueRepository for SqliteRepository {
    async fn load(&self) -> Result<Vec<AnswerRecord>, StorageError> {
        let row = sqlx::query("SELECT entries FROM offline_queue WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let entries: String = row
            .try_get("entries")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        serde_json::from_str(&entries).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn replace(&self, entries: &[AnswerRecord]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(entries)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO offline_queue (id, entries)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET entries = excluded.entries
            ",
        )
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM offline_queue WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
