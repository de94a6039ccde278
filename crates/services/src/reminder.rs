use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use tokio::sync::Mutex;

use storage::repository::{ProgressKey, ProgressRepository};

use crate::error::ReminderError;
use crate::timer::TimerHandle;

/// Local wall-clock hour of the daily reminder.
pub const REMINDER_HOUR: u32 = 17;

pub const REMINDER_TITLE: &str = "Multiplication Practice Reminder";
pub const REMINDER_BODY: &str = "It's time for your daily multiplication practice!";

/// The literal persisted when permission was granted.
const PERMISSION_GRANTED: &str = "granted";

/// Notification permission as reported by the platform collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

/// Platform notification collaborator; delivery happens outside this crate.
pub trait NotificationSink: Send + Sync {
    fn request_permission(&self) -> PermissionState;
    fn show(&self, title: &str, body: &str);
}

/// Next daily-reminder occurrence at or after `now`: today at 17:00 if
/// that is still ahead (or exactly now), else tomorrow at 17:00.
///
/// Returns `None` only when the local wall-clock time cannot be resolved
/// (a DST gap swallowing 17:00 two days running).
#[must_use]
pub fn next_reminder_at(now: DateTime<Local>) -> Option<DateTime<Local>> {
    let today = reminder_on(now.date_naive());
    match today {
        Some(at) if now <= at => Some(at),
        _ => reminder_on(now.date_naive().checked_add_days(Days::new(1))?),
    }
}

fn reminder_on(date: NaiveDate) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(REMINDER_HOUR, 0, 0)?;
    Local.from_local_datetime(&naive).earliest()
}

/// Schedules one reminder per day at 17:00 local time, re-arming itself
/// after each firing.
///
/// The schedule is an owned, cancellable task: replacing or dropping the
/// scheduler aborts it, so no stale closure outlives its session.
pub struct ReminderScheduler {
    sink: Arc<dyn NotificationSink>,
    progress: Arc<dyn ProgressRepository>,
    schedule: Mutex<Option<TimerHandle>>,
    enabled: AtomicBool,
}

impl ReminderScheduler {
    #[must_use]
    pub fn new(sink: Arc<dyn NotificationSink>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            sink,
            progress,
            schedule: Mutex::new(None),
            enabled: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Re-arm the schedule when a previous session persisted the
    /// `"granted"` literal (startup).
    ///
    /// # Errors
    ///
    /// Returns `ReminderError::Storage` if the stored permission cannot be
    /// read.
    pub async fn restore(&self) -> Result<(), ReminderError> {
        let stored = self.progress.get(ProgressKey::NotificationPermission).await?;
        if stored.as_deref() == Some(PERMISSION_GRANTED) {
            self.enabled.store(true, Ordering::SeqCst);
            self.start_schedule().await;
        }
        Ok(())
    }

    /// Ask the collaborator for permission; on `Granted`, persist the
    /// literal and start the daily schedule. A denial changes nothing and
    /// is not persisted.
    ///
    /// # Errors
    ///
    /// Returns `ReminderError::Storage` if persisting the grant fails.
    pub async fn enable(&self) -> Result<PermissionState, ReminderError> {
        let permission = self.sink.request_permission();
        if permission == PermissionState::Granted {
            self.progress
                .set(ProgressKey::NotificationPermission, PERMISSION_GRANTED)
                .await?;
            self.enabled.store(true, Ordering::SeqCst);
            self.start_schedule().await;
        }
        Ok(permission)
    }

    /// Cancel the schedule (teardown).
    pub async fn cancel(&self) {
        if let Some(handle) = self.schedule.lock().await.take() {
            handle.cancel();
        }
    }

    async fn start_schedule(&self) {
        let sink = Arc::clone(&self.sink);
        let handle = TimerHandle::task(async move {
            loop {
                let Some(next) = next_reminder_at(Local::now()) else {
                    break;
                };
                let wait = (next - Local::now()).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;
                sink.show(REMINDER_TITLE, REMINDER_BODY);
            }
        });
        // Replacing the handle aborts any previous schedule.
        *self.schedule.lock().await = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::sync::atomic::AtomicUsize;
    use storage::repository::InMemoryRepository;

    struct StubSink {
        permission: PermissionState,
        shows: AtomicUsize,
    }

    impl StubSink {
        fn granting() -> Arc<Self> {
            Arc::new(Self {
                permission: PermissionState::Granted,
                shows: AtomicUsize::new(0),
            })
        }

        fn denying() -> Arc<Self> {
            Arc::new(Self {
                permission: PermissionState::Denied,
                shows: AtomicUsize::new(0),
            })
        }
    }

    impl NotificationSink for StubSink {
        fn request_permission(&self) -> PermissionState {
            self.permission
        }

        fn show(&self, _title: &str, _body: &str) {
            self.shows.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn enable_persists_the_grant_and_arms_the_schedule() {
        let repo = Arc::new(InMemoryRepository::new());
        let scheduler = ReminderScheduler::new(StubSink::granting(), repo.clone());
        assert!(!scheduler.is_enabled());

        let permission = scheduler.enable().await.unwrap();
        assert_eq!(permission, PermissionState::Granted);
        assert!(scheduler.is_enabled());
        assert_eq!(
            repo.get(ProgressKey::NotificationPermission).await.unwrap(),
            Some("granted".to_owned())
        );

        scheduler.cancel().await;
    }

    #[tokio::test]
    async fn denial_is_not_persisted_and_leaves_reminders_off() {
        let repo = Arc::new(InMemoryRepository::new());
        let scheduler = ReminderScheduler::new(StubSink::denying(), repo.clone());

        let permission = scheduler.enable().await.unwrap();
        assert_eq!(permission, PermissionState::Denied);
        assert!(!scheduler.is_enabled());
        assert_eq!(
            repo.get(ProgressKey::NotificationPermission).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn restore_rearms_only_on_the_granted_literal() {
        let repo = Arc::new(InMemoryRepository::new());

        let scheduler = ReminderScheduler::new(StubSink::granting(), repo.clone());
        scheduler.restore().await.unwrap();
        assert!(!scheduler.is_enabled(), "nothing stored, nothing armed");

        repo.set(ProgressKey::NotificationPermission, "denied")
            .await
            .unwrap();
        scheduler.restore().await.unwrap();
        assert!(!scheduler.is_enabled());

        repo.set(ProgressKey::NotificationPermission, "granted")
            .await
            .unwrap();
        scheduler.restore().await.unwrap();
        assert!(scheduler.is_enabled());

        scheduler.cancel().await;
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("test datetime should be unambiguous")
    }

    #[test]
    fn before_five_pm_schedules_today() {
        let next = next_reminder_at(local(2026, 8, 6, 9, 30)).unwrap();
        assert_eq!(next.date_naive(), local(2026, 8, 6, 9, 30).date_naive());
        assert_eq!(next.hour(), REMINDER_HOUR);
        assert_eq!(next.minute(), 0);
    }

    #[test]
    fn exactly_five_pm_fires_now() {
        let at_five = local(2026, 8, 6, 17, 0);
        assert_eq!(next_reminder_at(at_five).unwrap(), at_five);
    }

    #[test]
    fn after_five_pm_schedules_tomorrow() {
        let next = next_reminder_at(local(2026, 8, 6, 18, 1)).unwrap();
        assert_eq!(
            next.date_naive(),
            local(2026, 8, 7, 0, 0).date_naive()
        );
        assert_eq!(next.hour(), REMINDER_HOUR);
    }

    #[test]
    fn occurrence_is_never_in_the_past() {
        for hour in 0..24 {
            let now = local(2026, 8, 6, hour, 15);
            let next = next_reminder_at(now).unwrap();
            assert!(next > now, "hour {hour}: {next} not after {now}");
        }
    }
}
