use crate::model::MAX_LEVEL;

//
// ─── CONSTANTS ─────────────────────────────────────────────────────────────────
//

/// Consecutive correct answers required to level up.
pub const LEVEL_UP_STREAK: u8 = 5;

/// Consecutive incorrect answers that trigger a level down.
pub const LEVEL_DOWN_MISSES: u8 = 3;

/// Questions per day the progress display treats as the goal.
pub const DAILY_GOAL: u32 = 20;

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

/// Inputs to the progression state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressionEvent {
    /// The current question was answered correctly.
    CorrectAnswer,
    /// The current question was answered incorrectly.
    IncorrectAnswer,
    /// Clears the transient celebration/level-up flags. Issued after the
    /// post-answer feedback delay, before the next question is accepted.
    ResetCelebration,
    /// Manual level change; the target is clamped to `[1, MAX_LEVEL]` and
    /// both streaks reset regardless of direction or magnitude.
    SetLevel(u8),
    /// Overwrites the daily progress counter (session restore only).
    SetDailyProgress(u32),
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// The streak-based leveling game: a pure reducer over level, streaks,
/// daily progress, and the transient celebration flags.
///
/// Invariant: `streak > 0` implies `incorrect_streak == 0` and vice versa;
/// an answer always zeroes the opposite streak. Level-up and level-down
/// fire on the same event that crosses the threshold, so neither streak
/// ever exceeds its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionState {
    pub level: u8,
    pub streak: u8,
    pub incorrect_streak: u8,
    pub daily_progress: u32,
    pub show_celebration: bool,
    pub show_level_up: bool,
}

impl ProgressionState {
    /// Fresh state at level 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            level: 1,
            streak: 0,
            incorrect_streak: 0,
            daily_progress: 0,
            show_celebration: false,
            show_level_up: false,
        }
    }

    /// Applies one event and returns the next state.
    #[must_use]
    pub fn apply(self, event: ProgressionEvent) -> Self {
        match event {
            ProgressionEvent::CorrectAnswer => {
                let new_streak = self.streak + 1;
                let level_up = new_streak >= LEVEL_UP_STREAK && self.level < MAX_LEVEL;
                Self {
                    level: if level_up { self.level + 1 } else { self.level },
                    streak: if level_up { 0 } else { new_streak },
                    incorrect_streak: 0,
                    daily_progress: self.daily_progress + 1,
                    show_celebration: true,
                    show_level_up: level_up,
                }
            }
            ProgressionEvent::IncorrectAnswer => {
                let new_misses = self.incorrect_streak + 1;
                let level_down = new_misses >= LEVEL_DOWN_MISSES && self.level > 1;
                Self {
                    level: if level_down { self.level - 1 } else { self.level },
                    streak: 0,
                    incorrect_streak: if level_down { 0 } else { new_misses },
                    show_celebration: false,
                    show_level_up: false,
                    ..self
                }
            }
            ProgressionEvent::ResetCelebration => Self {
                show_celebration: false,
                show_level_up: false,
                ..self
            },
            ProgressionEvent::SetLevel(target) => Self {
                level: target.clamp(1, MAX_LEVEL),
                streak: 0,
                incorrect_streak: 0,
                ..self
            },
            ProgressionEvent::SetDailyProgress(n) => Self {
                daily_progress: n,
                ..self
            },
        }
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use ProgressionEvent::{
        CorrectAnswer, IncorrectAnswer, ResetCelebration, SetDailyProgress, SetLevel,
    };

    fn state(level: u8, streak: u8, incorrect_streak: u8) -> ProgressionState {
        ProgressionState {
            level,
            streak,
            incorrect_streak,
            ..ProgressionState::new()
        }
    }

    #[test]
    fn correct_below_threshold_keeps_level() {
        for streak in 0..LEVEL_UP_STREAK - 1 {
            let next = state(3, streak, 0).apply(CorrectAnswer);
            assert_eq!(next.level, 3);
            assert_eq!(next.streak, streak + 1);
            assert!(!next.show_level_up);
            assert!(next.show_celebration);
        }
    }

    #[test]
    fn fifth_correct_levels_up_and_resets_streak() {
        let next = state(3, 4, 0).apply(CorrectAnswer);
        assert_eq!(next.level, 4);
        assert_eq!(next.streak, 0);
        assert!(next.show_level_up);
        assert!(next.show_celebration);
    }

    #[test]
    fn no_level_up_past_ceiling() {
        let next = state(MAX_LEVEL, 4, 0).apply(CorrectAnswer);
        assert_eq!(next.level, MAX_LEVEL);
        // Streak keeps counting at the ceiling; it never crossed into a
        // level change.
        assert_eq!(next.streak, 5);
        assert!(!next.show_level_up);
    }

    #[test]
    fn answers_zero_the_opposite_streak() {
        let after_miss = state(2, 3, 0).apply(IncorrectAnswer);
        assert_eq!(after_miss.streak, 0);

        let after_hit = state(2, 0, 2).apply(CorrectAnswer);
        assert_eq!(after_hit.incorrect_streak, 0);
    }

    #[test]
    fn correct_increments_daily_progress() {
        let next = ProgressionState::new().apply(CorrectAnswer);
        assert_eq!(next.daily_progress, 1);

        let after_miss = next.apply(IncorrectAnswer);
        assert_eq!(after_miss.daily_progress, 1);
    }

    #[test]
    fn third_miss_levels_down_and_resets_misses() {
        let next = state(3, 0, 2).apply(IncorrectAnswer);
        assert_eq!(next.level, 2);
        assert_eq!(next.incorrect_streak, 0);
        assert!(!next.show_celebration);
        assert!(!next.show_level_up);
    }

    #[test]
    fn no_level_down_below_floor() {
        let next = state(1, 0, 2).apply(IncorrectAnswer);
        assert_eq!(next.level, 1);
        assert_eq!(next.incorrect_streak, 3);
    }

    #[test]
    fn set_level_clamps_both_ends_and_resets_streaks() {
        let floored = state(4, 3, 1).apply(SetLevel(0));
        assert_eq!(floored.level, 1);
        assert_eq!(floored.streak, 0);
        assert_eq!(floored.incorrect_streak, 0);

        let capped = state(4, 3, 1).apply(SetLevel(MAX_LEVEL + 5));
        assert_eq!(capped.level, MAX_LEVEL);
        assert_eq!(capped.streak, 0);
        assert_eq!(capped.incorrect_streak, 0);
    }

    #[test]
    fn set_daily_progress_overwrites_unconditionally() {
        let next = state(4, 3, 0).apply(SetDailyProgress(17));
        assert_eq!(next.daily_progress, 17);
        assert_eq!(next.streak, 3);
    }

    #[test]
    fn reset_celebration_clears_flags_and_nothing_else() {
        let celebrating = state(2, 1, 0).apply(CorrectAnswer);
        assert!(celebrating.show_celebration);

        let cleared = celebrating.apply(ResetCelebration);
        assert!(!cleared.show_celebration);
        assert!(!cleared.show_level_up);
        assert_eq!(cleared.level, celebrating.level);
        assert_eq!(cleared.streak, celebrating.streak);
        assert_eq!(cleared.daily_progress, celebrating.daily_progress);
    }

    #[test]
    fn reset_celebration_is_idempotent() {
        let once = state(2, 2, 0).apply(CorrectAnswer).apply(ResetCelebration);
        let twice = once.apply(ResetCelebration);
        assert_eq!(twice, once);
    }

    #[test]
    fn five_straight_correct_from_level_one() {
        let mut s = ProgressionState::new();
        for i in 0..4 {
            s = s.apply(CorrectAnswer);
            assert_eq!(s.level, 1);
            assert_eq!(s.streak, i + 1);
            assert!(!s.show_level_up);
        }
        s = s.apply(CorrectAnswer);
        assert_eq!(s.level, 2);
        assert_eq!(s.streak, 0);
        assert!(s.show_level_up);
        assert_eq!(s.daily_progress, 5);
    }

    #[test]
    fn three_straight_misses_from_level_three() {
        let mut s = state(3, 0, 0);
        for _ in 0..2 {
            s = s.apply(IncorrectAnswer);
            assert_eq!(s.level, 3);
        }
        s = s.apply(IncorrectAnswer);
        assert_eq!(s.level, 2);
        assert_eq!(s.incorrect_streak, 0);
    }

    #[test]
    fn streak_exclusivity_holds_across_mixed_play() {
        let mut s = ProgressionState::new();
        for event in [
            CorrectAnswer,
            CorrectAnswer,
            IncorrectAnswer,
            CorrectAnswer,
            IncorrectAnswer,
            IncorrectAnswer,
            CorrectAnswer,
        ] {
            s = s.apply(event);
            assert!(
                s.streak == 0 || s.incorrect_streak == 0,
                "both streaks nonzero: {s:?}"
            );
        }
    }
}
