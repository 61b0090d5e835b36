//! Read-only projection of a session for the presentation layer.

use exam_core::model::{OptionLetter, Question, QuestionKind, TestId};

use super::AnswerState;
use super::session::{QuestionState, QuizSession};

/// Label of the primary action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Next,
    Finish,
}

impl ButtonState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Next => "Next",
            ButtonState::Finish => "Finish",
        }
    }
}

/// One answer choice as it should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerView {
    pub letter: OptionLetter,
    pub text: String,
    pub image: Option<String>,
    pub state: AnswerState,
    /// Choices stop being clickable once the answer is locked in.
    pub is_clickable: bool,
}

/// The current question as it should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: String,
    pub number: u32,
    pub text: String,
    pub kind: QuestionKind,
    pub main_image: Option<String>,
    pub video_name: Option<String>,
    pub answers: Vec<AnswerView>,
    /// Shown only after the answer is checked.
    pub explanation: Option<String>,
}

/// Everything a quiz screen needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub test_id: TestId,
    pub current_index: usize,
    pub question_count: usize,
    /// Fraction of the test already behind the user, in `0.0..=1.0`.
    pub progress: f64,
    /// Counter label such as `3/50`.
    pub progress_label: String,
    pub button: ButtonState,
    pub can_go_back: bool,
    pub is_complete: bool,
    pub question: QuestionView,
}

impl QuizSession {
    /// Project the session into render-ready state.
    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        let index = self.current_index();
        let count = self.question_count();
        let question = self.current_question();
        let state = self.state(index);

        let button = if index + 1 < count {
            ButtonState::Next
        } else {
            ButtonState::Finish
        };

        QuizSnapshot {
            test_id: self.test_id().clone(),
            current_index: index,
            question_count: count,
            progress: index as f64 / count as f64,
            progress_label: format!("{}/{count}", index + 1),
            button,
            can_go_back: index > 0,
            is_complete: self.is_complete(),
            question: question_view(question, state),
        }
    }
}

fn question_view(question: &Question, state: QuestionState) -> QuestionView {
    let answers = question
        .options()
        .iter()
        .map(|option| AnswerView {
            letter: option.letter,
            text: option.text.clone(),
            image: option.image.clone(),
            state: answer_state(state, question, option.letter),
            is_clickable: !state.checked,
        })
        .collect();

    QuestionView {
        id: question.id().to_string(),
        number: question.order(),
        text: question.text().to_string(),
        kind: question.kind(),
        main_image: question.main_image().map(str::to_string),
        video_name: question.video_name().map(str::to_string),
        answers,
        explanation: state.checked.then(|| question.explanation().to_string()),
    }
}

/// After checking, the correct option always shows green; a wrong pick shows
/// red alongside it. Before checking, only the picked option is highlighted.
fn answer_state(state: QuestionState, question: &Question, letter: OptionLetter) -> AnswerState {
    if !state.checked {
        return if state.selection == Some(letter) {
            AnswerState::Selected
        } else {
            AnswerState::Unanswered
        };
    }
    if question.is_correct(letter) {
        AnswerState::Correct
    } else if state.selection == Some(letter) {
        AnswerState::Incorrect
    } else {
        AnswerState::Unanswered
    }
}
