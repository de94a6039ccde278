use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use practice_core::Clock;
use storage::repository::{ProgressKey, Storage};

use crate::auth::AuthService;
use crate::context::SessionContext;
use crate::error::{AppServicesError, RecorderError};
use crate::practice::{PracticeController, PracticeLoopService};
use crate::recorder::RecorderService;
use crate::reminder::{NotificationSink, ReminderScheduler};
use crate::remote::{HttpRemoteStore, Identity, RemoteStore};
use crate::sync::SyncService;

/// Assembles the app-facing services and restores persisted session state.
#[derive(Clone)]
pub struct AppServices {
    context: Arc<Mutex<SessionContext>>,
    practice: Arc<PracticeLoopService>,
    recorder: Arc<RecorderService>,
    auth: Arc<AuthService>,
    sync: Arc<SyncService>,
    reminders: Arc<ReminderScheduler>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the env-configured
    /// remote store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or state
    /// restoration fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let remote: Arc<dyn RemoteStore> = Arc::new(HttpRemoteStore::from_env());
        Self::assemble(storage, remote, clock, sink).await
    }

    /// Wire the services over explicit storage and remote backends
    /// (injection point for tests and alternative hosts).
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if restoring persisted state fails.
    pub async fn assemble(
        storage: Storage,
        remote: Arc<dyn RemoteStore>,
        clock: Clock,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, AppServicesError> {
        let context = Arc::new(Mutex::new(SessionContext::new()));

        let recorder = Arc::new(RecorderService::new(
            Arc::clone(&remote),
            Arc::clone(&storage.offline_queue),
        ));
        recorder.restore().await?;

        let controller =
            restore_controller(clock, StdRng::from_os_rng(), &storage).await?;
        let practice = Arc::new(PracticeLoopService::new(
            controller,
            Arc::clone(&recorder),
            Arc::clone(&storage.progress),
            Arc::clone(&context),
            clock,
        ));

        let auth = Arc::new(AuthService::new(
            Arc::clone(&remote),
            Arc::clone(&context),
        ));
        if let Err(err) = auth.restore_session().await {
            tracing::warn!(error = %err, "session restore failed");
        }

        let sync = Arc::new(SyncService::new(
            Arc::clone(&recorder),
            Arc::clone(&context),
        ));

        let reminders = Arc::new(ReminderScheduler::new(sink, Arc::clone(&storage.progress)));
        if let Err(err) = reminders.restore().await {
            tracing::warn!(error = %err, "reminder restore failed");
        }

        Ok(Self {
            context,
            practice,
            recorder,
            auth,
            sync,
            reminders,
        })
    }

    #[must_use]
    pub fn context(&self) -> Arc<Mutex<SessionContext>> {
        Arc::clone(&self.context)
    }

    #[must_use]
    pub fn practice(&self) -> Arc<PracticeLoopService> {
        Arc::clone(&self.practice)
    }

    #[must_use]
    pub fn recorder(&self) -> Arc<RecorderService> {
        Arc::clone(&self.recorder)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn sync(&self) -> Arc<SyncService> {
        Arc::clone(&self.sync)
    }

    #[must_use]
    pub fn reminders(&self) -> Arc<ReminderScheduler> {
        Arc::clone(&self.reminders)
    }

    /// Host signal: connectivity restored. Flushes the pending queue once
    /// per offline→online transition when an identity is present.
    ///
    /// # Errors
    ///
    /// Returns `RecorderError` when the flush fails; the queue is retained.
    pub async fn handle_online(&self) -> Result<usize, RecorderError> {
        self.sync.handle_online().await
    }

    /// Host signal: connectivity lost.
    pub async fn handle_offline(&self) {
        self.sync.handle_offline().await;
    }

    /// Host signal: the auth listener delivered an identity change.
    pub async fn handle_auth_change(&self, identity: Option<Identity>) {
        self.sync.handle_auth_change(identity).await;
    }

    /// Cancel owned timers (teardown).
    pub async fn shutdown(&self) {
        self.practice.cancel_timers().await;
        self.reminders.cancel().await;
    }
}

/// Rebuild the controller from persisted level and daily progress.
///
/// The level goes through the reducer's clamped `SetLevel`; the daily
/// counter is restored only when the stored practice date matches today's
/// local day stamp, else it resets to 0 and the stored date rolls forward.
async fn restore_controller(
    clock: Clock,
    rng: StdRng,
    storage: &Storage,
) -> Result<PracticeController, AppServicesError> {
    let mut controller = PracticeController::new(clock, rng);

    if let Some(saved) = storage.progress.get(ProgressKey::Level).await? {
        if let Ok(level) = saved.parse::<u8>() {
            controller.restore_level(level);
        }
    }

    let today = clock.local_day_stamp();
    let last_practice = storage.progress.get(ProgressKey::LastPracticeDate).await?;
    if last_practice.as_deref() == Some(today.as_str()) {
        if let Some(saved) = storage.progress.get(ProgressKey::DailyProgress).await? {
            if let Ok(daily) = saved.parse::<u32>() {
                controller.restore_daily_progress(daily);
            }
        }
    } else {
        storage.progress.set(ProgressKey::DailyProgress, "0").await?;
        storage
            .progress
            .set(ProgressKey::LastPracticeDate, &today)
            .await?;
    }

    Ok(controller)
}
