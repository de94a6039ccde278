use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use practice_core::{Clock, ProgressionState, Question};
use storage::repository::{ProgressKey, ProgressRepository};

use crate::context::SessionContext;
use crate::error::PracticeError;
use crate::practice::controller::{PracticeController, SubmittedAnswer};
use crate::recorder::RecorderService;
use crate::timer::TimerHandle;

/// Delay between an answer and the reset that presents the next question.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(2000);

/// Orchestrates the per-answer flow around the controller: recording,
/// progress persistence, and the feedback-reset timer.
///
/// The reset timer is an owned, cancellable handle; scheduling a new one
/// (or dropping the service) aborts its predecessor, so a stale timer
/// never fires against replaced state.
pub struct PracticeLoopService {
    controller: Arc<Mutex<PracticeController>>,
    recorder: Arc<RecorderService>,
    progress: Arc<dyn ProgressRepository>,
    context: Arc<Mutex<SessionContext>>,
    clock: Clock,
    reset_timer: Mutex<Option<TimerHandle>>,
}

impl PracticeLoopService {
    #[must_use]
    pub fn new(
        controller: PracticeController,
        recorder: Arc<RecorderService>,
        progress: Arc<dyn ProgressRepository>,
        context: Arc<Mutex<SessionContext>>,
        clock: Clock,
    ) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            recorder,
            progress,
            context,
            clock,
            reset_timer: Mutex::new(None),
        }
    }

    /// Snapshot of the progression state.
    pub async fn state(&self) -> ProgressionState {
        self.controller.lock().await.state()
    }

    /// The live question.
    pub async fn question(&self) -> Question {
        self.controller.lock().await.question()
    }

    /// The upcoming-questions preview.
    pub async fn upcoming(&self) -> Vec<Question> {
        self.controller.lock().await.upcoming().to_vec()
    }

    /// Show or hide the hint for the live question.
    pub async fn toggle_hint(&self) -> bool {
        self.controller.lock().await.toggle_hint()
    }

    /// Submit an answer for the live question.
    ///
    /// Applies the answer to the progression reducer, records it (remote
    /// or offline queue per the session context), persists level and daily
    /// progress, and arms the feedback-reset timer. Recording and
    /// persistence failures degrade to warnings; the game state always
    /// advances.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::FeedbackPending` while the previous
    /// answer's feedback phase is still open.
    pub async fn submit_answer(&self, input: &str) -> Result<SubmittedAnswer, PracticeError> {
        let outcome = {
            let mut controller = self.controller.lock().await;
            controller.submit_answer(input)?
        };

        let ctx = { self.context.lock().await.clone() };
        if let Err(err) = self.recorder.record(outcome.record.clone(), &ctx).await {
            tracing::warn!(error = %err, "failed to record answer");
        }

        self.persist_progress().await;
        self.schedule_reset().await;

        Ok(outcome)
    }

    /// Step the level manually and persist the result.
    pub async fn change_level(&self, delta: i8) {
        {
            let mut controller = self.controller.lock().await;
            controller.change_level(delta);
        }
        self.persist_progress().await;
    }

    /// End the feedback phase immediately (hosts that drive their own
    /// timing call this instead of waiting out the timer).
    pub async fn complete_feedback(&self) {
        if let Some(timer) = self.reset_timer.lock().await.take() {
            timer.cancel();
        }
        self.controller.lock().await.complete_feedback();
    }

    /// Cancel any armed timer (teardown).
    pub async fn cancel_timers(&self) {
        if let Some(timer) = self.reset_timer.lock().await.take() {
            timer.cancel();
        }
    }

    async fn schedule_reset(&self) {
        let controller = Arc::clone(&self.controller);
        let handle = TimerHandle::after(FEEDBACK_DELAY, async move {
            controller.lock().await.complete_feedback();
        });
        // Replacing the handle aborts any timer still pending.
        *self.reset_timer.lock().await = Some(handle);
    }

    async fn persist_progress(&self) {
        let (level, daily_progress) = {
            let controller = self.controller.lock().await;
            let state = controller.state();
            (state.level, state.daily_progress)
        };

        let writes = [
            (ProgressKey::Level, level.to_string()),
            (ProgressKey::DailyProgress, daily_progress.to_string()),
            (ProgressKey::LastPracticeDate, self.clock.local_day_stamp()),
        ];
        for (key, value) in writes {
            if let Err(err) = self.progress.set(key, &value).await {
                tracing::warn!(error = %err, key = key.as_str(), "progress write failed");
            }
        }
    }
}
