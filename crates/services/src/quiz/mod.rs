//! Quiz session engine and its orchestration.
//!
//! `QuizSession` is a pure state machine over one test's questions; it does
//! no I/O. `QuizService` wraps it and writes progress, mistakes, and
//! completion records through the repositories as the session moves.

mod session;
mod view;
mod workflow;

pub use session::{Advance, CheckedAnswer, CloseAction, QuizSession};
pub use view::{AnswerView, ButtonState, QuestionView, QuizSnapshot};
pub use workflow::{AdvanceOutcome, QuizResult, QuizService};

pub use exam_core::model::FinishTally;

/// Visual state of a single answer choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Selected,
    Correct,
    Incorrect,
}
