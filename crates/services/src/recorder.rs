use std::sync::Arc;

use tokio::sync::Mutex;

use practice_core::AnswerRecord;
use storage::repository::OfflineQueueRepository;

use crate::context::SessionContext;
use crate::error::RecorderError;
use crate::remote::{Identity, RemoteStore};

/// Durable, at-least-once recorder for answered questions.
///
/// Online with an identity, each record goes straight to the remote store;
/// otherwise it lands in the pending queue, persisted whole on every
/// append. The pending queue lives behind an async mutex held across the
/// flush's remote call, so a `record` racing a `flush` can neither lose
/// nor duplicate an entry.
pub struct RecorderService {
    remote: Arc<dyn RemoteStore>,
    queue: Arc<dyn OfflineQueueRepository>,
    pending: Mutex<Vec<AnswerRecord>>,
}

impl RecorderService {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>, queue: Arc<dyn OfflineQueueRepository>) -> Self {
        Self {
            remote,
            queue,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Restore the pending queue from durable storage (startup).
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Storage` if the persisted queue cannot be
    /// read.
    pub async fn restore(&self) -> Result<(), RecorderError> {
        let persisted = self.queue.load().await?;
        *self.pending.lock().await = persisted;
        Ok(())
    }

    /// Number of entries waiting for a flush.
    pub async fn pending_len(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Record one answered question.
    ///
    /// Online with an identity, the entry is sent directly; a failed send
    /// is logged and dropped, not queued. The queue only buffers answers
    /// recorded while offline or signed out, and the whole queue is
    /// rewritten to durable storage on every append.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Storage` if persisting the queue fails.
    pub async fn record(
        &self,
        entry: AnswerRecord,
        ctx: &SessionContext,
    ) -> Result<(), RecorderError> {
        if ctx.online() {
            if let Some(identity) = ctx.identity() {
                if let Err(err) = self
                    .remote
                    .insert_answers(std::slice::from_ref(&entry), identity)
                    .await
                {
                    tracing::warn!(error = %err, "question log insert failed");
                }
                return Ok(());
            }
        }

        let mut pending = self.pending.lock().await;
        pending.push(entry);
        self.queue.replace(&pending).await?;
        Ok(())
    }

    /// Drain the pending queue as one batch insert.
    ///
    /// On success the queue is cleared in memory and durable storage; on
    /// failure it is retained unchanged for a later transition. Returns
    /// the number of entries sent.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError::Remote` if the batch insert fails, or
    /// `RecorderError::Storage` if clearing the persisted queue fails.
    pub async fn flush(&self, identity: &Identity) -> Result<usize, RecorderError> {
        let mut pending = self.pending.lock().await;
        if pending.is_empty() {
            return Ok(0);
        }

        self.remote.insert_answers(&pending, identity).await?;

        let sent = pending.len();
        pending.clear();
        self.queue.clear().await?;
        Ok(sent)
    }
}
