mod controller;
mod workflow;

// Public API of the practice subsystem.
pub use controller::{Feedback, HISTORY_DISPLAY_LEN, PracticeController, SubmittedAnswer};
pub use workflow::{FEEDBACK_DELAY, PracticeLoopService};
