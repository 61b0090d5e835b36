use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::TestId;

//
// ─── OPTION LETTER ─────────────────────────────────────────────────────────────
//

/// The four answer choices of a multiple-choice question.
///
/// Using a sum type instead of raw letter strings makes malformed answers
/// unrepresentable past the parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [
        OptionLetter::A,
        OptionLetter::B,
        OptionLetter::C,
        OptionLetter::D,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionLetter::A => "A",
            OptionLetter::B => "B",
            OptionLetter::C => "C",
            OptionLetter::D => "D",
        }
    }

    /// Position of the letter within an options array.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            OptionLetter::A => 0,
            OptionLetter::B => 1,
            OptionLetter::C => 2,
            OptionLetter::D => 3,
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Presentation kind of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    Text,
    Image,
    Video,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::Image => "image",
            QuestionKind::Video => "video",
        }
    }
}

/// A single answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub letter: OptionLetter,
    pub text: String,
    pub image: Option<String>,
}

impl QuestionOption {
    #[must_use]
    pub fn new(letter: OptionLetter, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
            image: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("expected 4 options, got {got}")]
    WrongOptionCount { got: usize },

    #[error("option letter {letter} out of order or duplicated")]
    MisplacedOptionLetter { letter: OptionLetter },
}

/// One multiple-choice question with exactly one option per letter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: String,
    order: u32,
    category_id: String,
    text: String,
    kind: QuestionKind,
    options: Vec<QuestionOption>,
    correct_answer: OptionLetter,
    explanation: String,
    main_image: Option<String>,
    video_name: Option<String>,
}

impl Question {
    /// Build a question, enforcing the one-option-per-letter invariant.
    ///
    /// # Errors
    ///
    /// Returns `TestError` if the option list does not hold exactly A–D in order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        order: u32,
        category_id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionKind,
        options: Vec<QuestionOption>,
        correct_answer: OptionLetter,
        explanation: impl Into<String>,
        main_image: Option<String>,
        video_name: Option<String>,
    ) -> Result<Self, TestError> {
        if options.len() != OptionLetter::ALL.len() {
            return Err(TestError::WrongOptionCount { got: options.len() });
        }
        for (option, letter) in options.iter().zip(OptionLetter::ALL) {
            if option.letter != letter {
                return Err(TestError::MisplacedOptionLetter { letter });
            }
        }

        Ok(Self {
            id: id.into(),
            order,
            category_id: category_id.into(),
            text: text.into(),
            kind,
            options,
            correct_answer,
            explanation: explanation.into(),
            main_image,
            video_name,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    #[must_use]
    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// The option belonging to the given letter.
    #[must_use]
    pub fn option(&self, letter: OptionLetter) -> &QuestionOption {
        &self.options[letter.index()]
    }

    #[must_use]
    pub fn correct_answer(&self) -> OptionLetter {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn main_image(&self) -> Option<&str> {
        self.main_image.as_deref()
    }

    #[must_use]
    pub fn video_name(&self) -> Option<&str> {
        self.video_name.as_deref()
    }

    /// Whether the given letter is the correct answer.
    #[must_use]
    pub fn is_correct(&self, letter: OptionLetter) -> bool {
        letter == self.correct_answer
    }
}

//
// ─── TEST DATA ─────────────────────────────────────────────────────────────────
//

/// An ordered, immutable set of questions loaded from the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestData {
    id: TestId,
    test_number: u32,
    title: String,
    questions: Vec<Question>,
}

impl TestData {
    #[must_use]
    pub fn new(
        id: TestId,
        test_number: u32,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            test_number,
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TestId {
        &self.id
    }

    #[must_use]
    pub fn test_number(&self) -> u32 {
        self.test_number
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Catalog listing entry for a test. `is_premium` is an opaque flag the
/// presentation layer interprets; nothing in the core branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMetadata {
    pub id: TestId,
    pub file_name: String,
    pub title: String,
    pub total_questions: u32,
    pub category: String,
    pub is_premium: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<QuestionOption> {
        OptionLetter::ALL
            .into_iter()
            .map(|l| QuestionOption::new(l, format!("option {l}")))
            .collect()
    }

    fn build_question(correct: OptionLetter) -> Question {
        Question::new(
            "q1",
            1,
            "traffic",
            "What does a red light mean?",
            QuestionKind::Text,
            options(),
            correct,
            "Stop.",
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn question_requires_four_options() {
        let mut opts = options();
        opts.pop();
        let err = Question::new(
            "q1",
            1,
            "traffic",
            "?",
            QuestionKind::Text,
            opts,
            OptionLetter::A,
            "",
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err, TestError::WrongOptionCount { got: 3 });
    }

    #[test]
    fn question_rejects_misplaced_letters() {
        let mut opts = options();
        opts.swap(1, 2);
        let err = Question::new(
            "q1",
            1,
            "traffic",
            "?",
            QuestionKind::Text,
            opts,
            OptionLetter::A,
            "",
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TestError::MisplacedOptionLetter { .. }));
    }

    #[test]
    fn option_lookup_by_letter() {
        let q = build_question(OptionLetter::B);
        assert_eq!(q.option(OptionLetter::C).text, "option C");
        assert!(q.is_correct(OptionLetter::B));
        assert!(!q.is_correct(OptionLetter::A));
    }
}
