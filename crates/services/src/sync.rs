use std::sync::Arc;

use tokio::sync::Mutex;

use crate::context::SessionContext;
use crate::error::RecorderError;
use crate::recorder::RecorderService;
use crate::remote::Identity;

/// Bridges the host's connectivity and auth signals to the session context
/// and the recorder's flush.
#[derive(Clone)]
pub struct SyncService {
    recorder: Arc<RecorderService>,
    context: Arc<Mutex<SessionContext>>,
}

impl SyncService {
    #[must_use]
    pub fn new(recorder: Arc<RecorderService>, context: Arc<Mutex<SessionContext>>) -> Self {
        Self { recorder, context }
    }

    /// Handle an "online" signal from the host.
    ///
    /// Flushes the pending queue exactly once per offline→online
    /// transition, and only when an identity is present. Returns the number
    /// of entries sent (0 when nothing was flushed).
    ///
    /// # Errors
    ///
    /// Returns `RecorderError` when the flush fails; the queue is retained
    /// for a later transition.
    pub async fn handle_online(&self) -> Result<usize, RecorderError> {
        let (went_online, identity) = {
            let mut ctx = self.context.lock().await;
            let went_online = ctx.set_online();
            (went_online, ctx.identity().cloned())
        };

        if !went_online {
            return Ok(0);
        }
        let Some(identity) = identity else {
            return Ok(0);
        };

        match self.recorder.flush(&identity).await {
            Ok(sent) => {
                if sent > 0 {
                    tracing::info!(sent, "offline queue flushed");
                }
                Ok(sent)
            }
            Err(err) => {
                tracing::warn!(error = %err, "offline queue flush failed");
                Err(err)
            }
        }
    }

    /// Handle an "offline" signal from the host.
    pub async fn handle_offline(&self) {
        self.context.lock().await.set_offline();
    }

    /// Handle an identity change delivered by the host's auth listener.
    pub async fn handle_auth_change(&self, identity: Option<Identity>) {
        self.context.lock().await.set_identity(identity);
    }
}
