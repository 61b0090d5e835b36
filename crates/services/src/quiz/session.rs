use std::collections::BTreeMap;

use exam_core::model::{FinishTally, OptionLetter, Question, TestData, TestId, TestProgress};

use crate::error::QuizError;

/// Interaction state of one question within the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct QuestionState {
    pub(crate) selection: Option<OptionLetter>,
    pub(crate) checked: bool,
}

/// What the engine did on `advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at `index`.
    Moved { index: usize },
    /// The last question was left behind; the session is finished.
    Finished(FinishTally),
}

/// What the caller should do when the user asks to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Leave immediately; nothing meaningful would be lost.
    Exit,
    /// Ask for confirmation first; progress past the first question exists.
    ConfirmFirst,
}

/// A locked-in answer, ready to be persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedAnswer {
    pub question_index: u32,
    pub letter: OptionLetter,
    pub is_correct: bool,
}

/// In-memory state machine for one run through a test.
///
/// The session never touches storage. Transitions that the caller must
/// persist (`check_answer`, `advance`, `finish`) return the data to write;
/// `QuizService` owns the actual writes.
#[derive(Debug)]
pub struct QuizSession {
    test: TestData,
    states: Vec<QuestionState>,
    current: usize,
    completed: bool,
}

impl QuizSession {
    /// Build a session over a test, resuming from saved progress when given.
    ///
    /// Previously answered questions come back checked with their stored
    /// letter, and the session opens at the saved position clamped to the
    /// current question count.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` if the test has no questions.
    pub(crate) fn start(
        test: TestData,
        progress: Option<&TestProgress>,
    ) -> Result<Self, QuizError> {
        let count = test.question_count();
        if count == 0 {
            return Err(QuizError::Empty);
        }

        let mut states = vec![QuestionState::default(); count];
        if let Some(progress) = progress {
            for (&index, &letter) in progress.answered() {
                // Indexes past the current question count are dropped; the
                // content may have shrunk since the answers were recorded.
                if let Some(state) = states.get_mut(index as usize) {
                    state.selection = Some(letter);
                    state.checked = true;
                }
            }
        }

        let current = progress.map_or(0, |p| p.resume_index(count));
        Ok(Self {
            test,
            states,
            current,
            completed: false,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        self.test.id()
    }

    #[must_use]
    pub fn test(&self) -> &TestData {
        &self.test
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.test.questions()[self.current]
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub(crate) fn state(&self, index: usize) -> QuestionState {
        self.states[index]
    }

    /// Select a letter on the current question, or clear it by selecting the
    /// same letter again. Selecting a different letter replaces the pick.
    ///
    /// # Errors
    ///
    /// Returns `Completed` after the session finished, `AlreadyChecked` once
    /// the current question's answer is locked in.
    pub fn select_answer(&mut self, letter: OptionLetter) -> Result<(), QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        let state = &mut self.states[self.current];
        if state.checked {
            return Err(QuizError::AlreadyChecked);
        }
        state.selection = if state.selection == Some(letter) {
            None
        } else {
            Some(letter)
        };
        Ok(())
    }

    /// Lock in the current selection and report its correctness.
    ///
    /// # Errors
    ///
    /// Returns `NoSelection` with nothing picked, `AlreadyChecked` on a
    /// second check, `Completed` after the session finished.
    pub fn check_answer(&mut self) -> Result<CheckedAnswer, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        let question = &self.test.questions()[self.current];
        let state = &mut self.states[self.current];
        if state.checked {
            return Err(QuizError::AlreadyChecked);
        }
        let Some(letter) = state.selection else {
            return Err(QuizError::NoSelection);
        };
        state.checked = true;

        Ok(CheckedAnswer {
            question_index: self.current as u32,
            letter,
            is_correct: question.is_correct(letter),
        })
    }

    /// Move to the next question, or finish when already on the last one.
    ///
    /// # Errors
    ///
    /// Returns `Completed` after the session finished.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        if self.current + 1 < self.question_count() {
            self.current += 1;
            Ok(Advance::Moved {
                index: self.current,
            })
        } else {
            Ok(Advance::Finished(self.tally_and_complete()))
        }
    }

    /// Step back one question. Going back never rewinds answers; checked
    /// questions stay checked.
    pub fn go_back(&mut self) -> bool {
        if self.completed || self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Finish early, tallying every question as it stands.
    ///
    /// # Errors
    ///
    /// Returns `Completed` if the session already finished.
    pub fn finish(&mut self) -> Result<FinishTally, QuizError> {
        if self.completed {
            return Err(QuizError::Completed);
        }
        Ok(self.tally_and_complete())
    }

    fn tally_and_complete(&mut self) -> FinishTally {
        self.completed = true;
        let mut tally = FinishTally {
            correct: 0,
            wrong: 0,
            empty: 0,
        };
        for (question, state) in self.test.questions().iter().zip(&self.states) {
            match state.selection.filter(|_| state.checked) {
                Some(letter) if question.is_correct(letter) => tally.correct += 1,
                Some(_) => tally.wrong += 1,
                None => tally.empty += 1,
            }
        }
        tally
    }

    /// What to do when the user asks to leave mid-session.
    #[must_use]
    pub fn close(&self) -> CloseAction {
        if self.current > 0 {
            CloseAction::ConfirmFirst
        } else {
            CloseAction::Exit
        }
    }

    /// Checked answers keyed by question index, in persistence form.
    #[must_use]
    pub fn answered_map(&self) -> BTreeMap<u32, OptionLetter> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| s.checked)
            .filter_map(|(i, s)| s.selection.map(|l| (i as u32, l)))
            .collect()
    }
}
