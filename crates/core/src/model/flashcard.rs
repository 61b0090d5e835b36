use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Learning state of a flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningStatus {
    Learning,
    Learned,
}

impl LearningStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LearningStatus::Learning => "learning",
            LearningStatus::Learned => "learned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub provided: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a learning status: {:?}", self.provided)
    }
}

impl std::error::Error for ParseStatusError {}

impl std::str::FromStr for LearningStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learning" => Ok(LearningStatus::Learning),
            "learned" => Ok(LearningStatus::Learned),
            other => Err(ParseStatusError {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Flashcard learning record, unique per (category, card).
///
/// The pass-probability estimator consumes the count of learned cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardLearning {
    pub category_id: String,
    pub card_id: String,
    pub description: String,
    pub status: LearningStatus,
    pub saved_at: DateTime<Utc>,
}

impl FlashcardLearning {
    #[must_use]
    pub fn new(
        category_id: impl Into<String>,
        card_id: impl Into<String>,
        description: impl Into<String>,
        status: LearningStatus,
        saved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            card_id: card_id.into(),
            description: description.into(),
            status,
            saved_at,
        }
    }
}
