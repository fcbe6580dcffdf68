//! Parameters the player picks before a game starts.

use clap::ValueEnum;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Topics offered on the setup screen. The last entry is a free-text topic.
pub const TOPIC_PRESETS: [&str; 6] = [
    "General Knowledge",
    "Movies",
    "Sports",
    "Technology",
    "Science",
    "History",
];

pub const CUSTOM_TOPIC_LABEL: &str = "Custom Topic";

/// How hard the generated questions should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumIter, ValueEnum)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn next(self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let pos = all.iter().position(|d| *d == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn previous(self) -> Self {
        let all: Vec<Self> = Self::iter().collect();
        let pos = all.iter().position(|d| *d == self).unwrap_or(0);
        all[(pos + all.len() - 1) % all.len()]
    }
}

/// Number of questions in one game, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuestionCount(usize);

impl QuestionCount {
    pub const MIN: usize = 3;
    pub const MAX: usize = 10;

    /// Returns `None` when `count` is outside the allowed range.
    pub fn new(count: usize) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&count).then_some(Self(count))
    }

    /// Like `new`, but pulls out-of-range values to the nearest bound.
    pub fn clamped(count: usize) -> Self {
        Self(count.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn increment(self) -> Self {
        Self::clamped(self.0 + 1)
    }

    pub fn decrement(self) -> Self {
        Self::clamped(self.0.saturating_sub(1))
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(Self::MIN)
    }
}
