#![forbid(unsafe_code)]

pub mod generator;
pub mod model;
pub mod progression;
pub mod time;

pub use model::{AnswerRecord, BadgeTier, Question, badge_for_level, next_badge};
pub use progression::{ProgressionEvent, ProgressionState};
pub use time::Clock;
