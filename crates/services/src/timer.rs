use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owned handle for a scheduled action.
///
/// The action is aborted when the handle is cancelled or dropped, so a
/// replaced or torn-down owner never leaves a stale closure to fire
/// against new state.
#[derive(Debug)]
pub struct TimerHandle {
    inner: JoinHandle<()>,
}

impl TimerHandle {
    /// Runs `action` once after `delay`.
    pub fn after<F>(delay: Duration, action: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                action.await;
            }),
        }
    }

    /// Runs a long-lived scheduled task (e.g. a repeating reminder loop).
    pub fn task<F>(task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: tokio::spawn(task),
        }
    }

    /// Aborts the scheduled action if it has not run yet.
    pub fn cancel(&self) {
        self.inner.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.inner.abort();
    }
}
