mod badge;
mod question;
mod record;

pub use badge::{BADGE_TIERS, BadgeTier, MAX_LEVEL, badge_for_level, next_badge};
pub use question::{HINT_GRID_CELLS, Question};
pub use record::AnswerRecord;
