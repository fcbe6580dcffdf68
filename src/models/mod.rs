mod question;
mod settings;

pub use question::{CorrectKey, Question};
pub use settings::{CUSTOM_TOPIC_LABEL, Difficulty, QuestionCount, TOPIC_PRESETS};

/// Which screen the terminal UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Generating,
    Quiz,
    Result,
}
