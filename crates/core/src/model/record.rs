use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Immutable record of one answered question.
///
/// Created by the practice controller at answer-check time, appended to the
/// session history, and shipped to the remote store (directly when online,
/// via the offline queue otherwise). Never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    num1: u8,
    num2: u8,
    user_answer: Option<u32>,
    time_taken_secs: f64,
    used_hint: bool,
    correct: bool,
}

impl AnswerRecord {
    /// Build the record for an answered question.
    ///
    /// `user_answer` is `None` when the input did not parse as a number;
    /// that simply compares not-equal, i.e. an ordinary incorrect answer.
    #[must_use]
    pub fn new(
        question: Question,
        user_answer: Option<u32>,
        time_taken_secs: f64,
        used_hint: bool,
    ) -> Self {
        Self {
            num1: question.num1,
            num2: question.num2,
            user_answer,
            time_taken_secs,
            used_hint,
            correct: user_answer == Some(question.answer()),
        }
    }

    #[must_use]
    pub fn num1(&self) -> u8 {
        self.num1
    }

    #[must_use]
    pub fn num2(&self) -> u8 {
        self.num2
    }

    #[must_use]
    pub fn user_answer(&self) -> Option<u32> {
        self.user_answer
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> f64 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn used_hint(&self) -> bool {
        self.used_hint
    }

    #[must_use]
    pub fn correct(&self) -> bool {
        self.correct
    }

    /// The answer that would have been correct.
    #[must_use]
    pub fn expected_answer(&self) -> u32 {
        u32::from(self.num1) * u32::from(self.num2)
    }
}
