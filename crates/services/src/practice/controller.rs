use chrono::{DateTime, Utc};
use rand::rngs::StdRng;

use practice_core::generator::{self, PREVIEW_LEN};
use practice_core::{AnswerRecord, Clock, ProgressionEvent, ProgressionState, Question};

use crate::error::PracticeError;

/// History entries the display layer shows (all entries are retained).
pub const HISTORY_DISPLAY_LEN: usize = 5;

/// Feedback shown between an answer and the next question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_answer: u32 },
}

impl Feedback {
    /// Message text for the feedback banner.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Feedback::Correct => "Correct! Great job! 🎉".to_owned(),
            Feedback::Incorrect { correct_answer } => {
                format!("Oops! The correct answer is {correct_answer}. Keep trying! 💪")
            }
        }
    }
}

/// Outcome of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedAnswer {
    pub record: AnswerRecord,
    pub feedback: Feedback,
}

/// In-memory state of the practice session.
///
/// One question is live at a time. Submitting an answer moves the session
/// into a feedback phase; `complete_feedback` (driven by the workflow's
/// reset timer) clears the transient flags and presents the next question.
pub struct PracticeController {
    clock: Clock,
    rng: StdRng,
    state: ProgressionState,
    question: Question,
    upcoming: Vec<Question>,
    question_started_at: DateTime<Utc>,
    hint_shown: bool,
    hint_used: bool,
    feedback: Option<Feedback>,
    history: Vec<AnswerRecord>,
}

impl PracticeController {
    /// Fresh session at level 1 with an initial question and preview.
    #[must_use]
    pub fn new(clock: Clock, mut rng: StdRng) -> Self {
        let state = ProgressionState::new();
        let question = generator::generate(state.level, &mut rng);
        let upcoming = generator::generate_batch(state.level, PREVIEW_LEN, &mut rng);
        let question_started_at = clock.now();
        Self {
            clock,
            rng,
            state,
            question,
            upcoming,
            question_started_at,
            hint_shown: false,
            hint_used: false,
            feedback: None,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ProgressionState {
        self.state
    }

    #[must_use]
    pub fn question(&self) -> Question {
        self.question
    }

    #[must_use]
    pub fn upcoming(&self) -> &[Question] {
        &self.upcoming
    }

    #[must_use]
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    #[must_use]
    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    #[must_use]
    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    /// The most recent history entries, newest first, capped for display.
    #[must_use]
    pub fn recent_history(&self) -> Vec<&AnswerRecord> {
        self.history
            .iter()
            .rev()
            .take(HISTORY_DISPLAY_LEN)
            .collect()
    }

    /// Restore a persisted level (startup). Goes through the reducer's
    /// clamped `SetLevel`, then regenerates question and preview for the
    /// restored difficulty.
    pub fn restore_level(&mut self, level: u8) {
        self.set_level(level);
    }

    /// Restore the persisted daily progress counter (startup).
    pub fn restore_daily_progress(&mut self, n: u32) {
        self.state = self.state.apply(ProgressionEvent::SetDailyProgress(n));
    }

    /// Show or hide the hint; the first show marks the question as
    /// hint-assisted for its record.
    pub fn toggle_hint(&mut self) -> bool {
        self.hint_shown = !self.hint_shown;
        if self.hint_shown {
            self.hint_used = true;
        }
        self.hint_shown
    }

    /// Check the given input against the live question.
    ///
    /// Non-numeric input simply compares not-equal: an ordinary incorrect
    /// answer, not an error. The record is appended to history and the
    /// progression reducer is fed before this returns, so a later
    /// `ResetCelebration` can never be observed ahead of its answer event.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::FeedbackPending` while the previous
    /// answer's feedback phase is still open.
    pub fn submit_answer(&mut self, input: &str) -> Result<SubmittedAnswer, PracticeError> {
        if self.feedback.is_some() {
            return Err(PracticeError::FeedbackPending);
        }

        let elapsed = self.clock.now() - self.question_started_at;
        let time_taken_secs = elapsed.num_milliseconds() as f64 / 1000.0;
        let parsed = input.trim().parse::<u32>().ok();

        let record = AnswerRecord::new(self.question, parsed, time_taken_secs, self.hint_used);
        self.history.push(record.clone());

        let event = if record.correct() {
            ProgressionEvent::CorrectAnswer
        } else {
            ProgressionEvent::IncorrectAnswer
        };
        self.state = self.state.apply(event);

        let feedback = if record.correct() {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct_answer: record.expected_answer(),
            }
        };
        self.feedback = Some(feedback);

        Ok(SubmittedAnswer { record, feedback })
    }

    /// End the feedback phase: clear the transient flags and present the
    /// next question at the (possibly changed) level. No-op while no
    /// feedback phase is open.
    pub fn complete_feedback(&mut self) {
        if self.feedback.is_none() {
            return;
        }
        self.state = self.state.apply(ProgressionEvent::ResetCelebration);
        self.next_question();
    }

    /// Manual level change; the reducer clamps to `[1, MAX_LEVEL]` and
    /// resets both streaks. A changed level regenerates question and
    /// preview immediately.
    pub fn set_level(&mut self, target: u8) {
        let before = self.state.level;
        self.state = self.state.apply(ProgressionEvent::SetLevel(target));
        if self.state.level != before {
            self.next_question();
        }
    }

    /// Step the level by `delta` (the up/down controls).
    pub fn change_level(&mut self, delta: i8) {
        let target = self.state.level.saturating_add_signed(delta);
        self.set_level(target);
    }

    fn next_question(&mut self) {
        self.question = generator::generate(self.state.level, &mut self.rng);
        self.upcoming = generator::generate_batch(self.state.level, PREVIEW_LEN, &mut self.rng);
        self.question_started_at = self.clock.now();
        self.hint_shown = false;
        self.hint_used = false;
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use practice_core::time::fixed_clock;
    use rand::SeedableRng;

    fn build_controller() -> PracticeController {
        PracticeController::new(fixed_clock(), StdRng::seed_from_u64(11))
    }

    fn correct_input(controller: &PracticeController) -> String {
        controller.question().answer().to_string()
    }

    #[test]
    fn fresh_session_presents_a_level_one_question() {
        let controller = build_controller();
        assert_eq!(controller.state().level, 1);
        assert!((1..=2).contains(&controller.question().num1));
        assert_eq!(controller.upcoming().len(), PREVIEW_LEN);
        assert!(controller.feedback().is_none());
    }

    #[test]
    fn correct_answer_records_celebrates_and_counts() {
        let mut controller = build_controller();
        let input = correct_input(&controller);

        let outcome = controller.submit_answer(&input).unwrap();
        assert!(outcome.record.correct());
        assert_eq!(outcome.feedback, Feedback::Correct);

        let state = controller.state();
        assert!(state.show_celebration);
        assert_eq!(state.streak, 1);
        assert_eq!(state.daily_progress, 1);
        assert_eq!(controller.history().len(), 1);
    }

    #[test]
    fn incorrect_answer_reveals_the_expected_product() {
        let mut controller = build_controller();
        let expected = controller.question().answer();

        let outcome = controller.submit_answer("999").unwrap();
        assert!(!outcome.record.correct());
        assert_eq!(
            outcome.feedback,
            Feedback::Incorrect {
                correct_answer: expected
            }
        );
        assert!(outcome.feedback.message().contains(&expected.to_string()));
    }

    #[test]
    fn non_numeric_input_is_an_ordinary_miss() {
        let mut controller = build_controller();
        let outcome = controller.submit_answer("banana").unwrap();
        assert!(!outcome.record.correct());
        assert_eq!(outcome.record.user_answer(), None);
        assert_eq!(controller.state().incorrect_streak, 1);
    }

    #[test]
    fn submit_while_feedback_pending_is_rejected() {
        let mut controller = build_controller();
        controller.submit_answer("0").unwrap();
        assert!(matches!(
            controller.submit_answer("0"),
            Err(PracticeError::FeedbackPending)
        ));
    }

    #[test]
    fn complete_feedback_presents_a_fresh_question() {
        let mut controller = build_controller();
        controller.toggle_hint();
        controller.submit_answer("0").unwrap();

        controller.complete_feedback();
        let state = controller.state();
        assert!(!state.show_celebration);
        assert!(!state.show_level_up);
        assert!(controller.feedback().is_none());
        assert!(!controller.hint_shown());

        // the next answer starts with a clean hint flag
        let input = correct_input(&controller);
        let outcome = controller.submit_answer(&input).unwrap();
        assert!(!outcome.record.used_hint());
    }

    #[test]
    fn time_taken_comes_from_the_clock() {
        let mut clock = fixed_clock();
        let mut controller = PracticeController::new(clock, StdRng::seed_from_u64(3));
        clock.advance(Duration::milliseconds(3500));
        controller.clock = clock;

        let outcome = controller.submit_answer("0").unwrap();
        assert!((outcome.record.time_taken_secs() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn hint_toggle_marks_the_record_once_shown() {
        let mut controller = build_controller();
        assert!(controller.toggle_hint());
        assert!(!controller.toggle_hint());

        // hidden again, but the question still counts as hint-assisted
        let outcome = controller.submit_answer("0").unwrap();
        assert!(outcome.record.used_hint());
    }

    #[test]
    fn five_correct_answers_level_up_through_the_full_flow() {
        let mut controller = build_controller();
        for round in 0..5 {
            let input = correct_input(&controller);
            controller.submit_answer(&input).unwrap();
            let expect_level_up = round == 4;
            assert_eq!(controller.state().show_level_up, expect_level_up);
            controller.complete_feedback();
        }
        assert_eq!(controller.state().level, 2);
        assert_eq!(controller.state().streak, 0);
        // new questions come from the new difficulty bound
        assert!((1..=4).contains(&controller.question().num1));
    }

    #[test]
    fn manual_level_change_regenerates_for_the_new_bound() {
        let mut controller = build_controller();
        controller.set_level(10);
        assert_eq!(controller.state().level, 10);
        for q in controller.upcoming() {
            assert!((1..=20).contains(&q.num1));
            assert!((1..=20).contains(&q.num2));
        }

        controller.change_level(-1);
        assert_eq!(controller.state().level, 9);

        // stepping down from level 1 clamps at the floor
        controller.set_level(1);
        controller.change_level(-1);
        assert_eq!(controller.state().level, 1);
    }

    #[test]
    fn recent_history_is_newest_first_and_capped() {
        let mut controller = build_controller();
        for _ in 0..7 {
            controller.submit_answer("0").unwrap();
            controller.complete_feedback();
        }
        assert_eq!(controller.history().len(), 7);

        let recent = controller.recent_history();
        assert_eq!(recent.len(), HISTORY_DISPLAY_LEN);
        assert_eq!(recent[0], controller.history().last().unwrap());
    }

    #[test]
    fn restore_applies_level_and_daily_progress() {
        let mut controller = build_controller();
        controller.restore_level(6);
        controller.restore_daily_progress(13);

        assert_eq!(controller.state().level, 6);
        assert_eq!(controller.state().daily_progress, 13);
        assert!((1..=12).contains(&controller.question().num1));
    }
}
