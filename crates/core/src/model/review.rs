use chrono::{DateTime, Utc};

use crate::model::{OptionLetter, QuestionKey};

/// A question bookmarked by the user, independent of correctness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedQuestion {
    pub key: QuestionKey,
    pub question_text: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedQuestion {
    #[must_use]
    pub fn new(key: QuestionKey, question_text: impl Into<String>, saved_at: DateTime<Utc>) -> Self {
        Self {
            key,
            question_text: question_text.into(),
            saved_at,
        }
    }
}

/// A question currently answered incorrectly.
///
/// This set approximates "currently wrong", not a history log: entries are
/// upserted on a wrong check and removed by recheck flows once the same
/// question is answered correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeQuestion {
    pub key: QuestionKey,
    pub question_text: String,
    pub user_answer: OptionLetter,
    pub correct_answer: OptionLetter,
    pub created_at: DateTime<Utc>,
}

impl MistakeQuestion {
    #[must_use]
    pub fn new(
        key: QuestionKey,
        question_text: impl Into<String>,
        user_answer: OptionLetter,
        correct_answer: OptionLetter,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            question_text: question_text.into(),
            user_answer,
            correct_answer,
            created_at,
        }
    }
}
