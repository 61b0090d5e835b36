//! Orchestration around the quiz session state machine.

use std::sync::Arc;

use tracing::debug;

use exam_core::model::{FinishTally, QuestionKey, TestId};

use super::session::{Advance, CheckedAnswer, CloseAction, QuizSession};
use super::view::QuizSnapshot;
use crate::catalog::ContentCatalog;
use crate::error::QuizError;
use crate::progress_service::ProgressService;
use crate::review_service::ReviewService;

/// Outcome of the primary action button.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    Moved(QuizSnapshot),
    Finished(QuizResult),
}

/// Final numbers for the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub tally: FinishTally,
    /// Percentage over checked answers, truncated toward zero.
    pub score: u8,
}

/// Drives `QuizSession` and persists its transitions.
pub struct QuizService {
    catalog: Arc<dyn ContentCatalog>,
    progress: Arc<ProgressService>,
    reviews: Arc<ReviewService>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        catalog: Arc<dyn ContentCatalog>,
        progress: Arc<ProgressService>,
        reviews: Arc<ReviewService>,
    ) -> Self {
        Self {
            catalog,
            progress,
            reviews,
        }
    }

    /// Open a session for a test, resuming saved progress if any exists.
    ///
    /// Starting never writes; a progress record appears only once the first
    /// answer is checked.
    ///
    /// # Errors
    ///
    /// Returns `ContentNotFound` for an unknown test id, `Empty` for a test
    /// without questions, `Progress` on storage failures.
    pub async fn start(&self, test_id: &TestId) -> Result<QuizSession, QuizError> {
        let test = self
            .catalog
            .load_test(test_id)
            .await
            .ok_or_else(|| QuizError::ContentNotFound(test_id.clone()))?;
        let progress = self.progress.get(test_id).await?;
        debug!(
            test_id = %test_id,
            questions = test.question_count(),
            resuming = progress.is_some(),
            "quiz session started"
        );
        QuizSession::start(test, progress.as_ref())
    }

    /// Lock in the current selection, persist it, and file a mistake entry
    /// when it is wrong.
    ///
    /// # Errors
    ///
    /// Propagates the session's `NoSelection`/`AlreadyChecked`/`Completed`
    /// errors and storage failures.
    pub async fn check_answer(
        &self,
        session: &mut QuizSession,
    ) -> Result<CheckedAnswer, QuizError> {
        let checked = session.check_answer()?;
        let total = u32::try_from(session.question_count()).unwrap_or(u32::MAX);
        self.progress
            .record_answer(
                session.test_id(),
                total,
                checked.question_index,
                checked.letter,
                checked.is_correct,
            )
            .await?;

        if !checked.is_correct {
            let question = &session.test().questions()[checked.question_index as usize];
            let key = QuestionKey::new(session.test_id().clone(), checked.question_index);
            self.reviews
                .record_mistake(
                    &key,
                    question.text(),
                    checked.letter,
                    question.correct_answer(),
                )
                .await?;
        }
        Ok(checked)
    }

    /// Move forward, saving the new position, or finish from the last
    /// question and persist the completion record.
    ///
    /// # Errors
    ///
    /// Returns `Completed` after the session finished, storage errors
    /// otherwise.
    pub async fn advance(&self, session: &mut QuizSession) -> Result<AdvanceOutcome, QuizError> {
        match session.advance()? {
            Advance::Moved { index } => {
                let total = u32::try_from(session.question_count()).unwrap_or(u32::MAX);
                self.progress
                    .save_position(session.test_id(), total, index as u32)
                    .await?;
                Ok(AdvanceOutcome::Moved(session.snapshot()))
            }
            Advance::Finished(tally) => Ok(AdvanceOutcome::Finished(
                self.persist_finish(session, tally).await?,
            )),
        }
    }

    /// Finish the session early from any question.
    ///
    /// # Errors
    ///
    /// Returns `Completed` if already finished, storage errors otherwise.
    pub async fn finish(&self, session: &mut QuizSession) -> Result<QuizResult, QuizError> {
        let tally = session.finish()?;
        self.persist_finish(session, tally).await
    }

    /// Step back without persisting; position is only saved moving forward.
    pub fn go_back(&self, session: &mut QuizSession) -> bool {
        session.go_back()
    }

    #[must_use]
    pub fn close(&self, session: &QuizSession) -> CloseAction {
        session.close()
    }

    async fn persist_finish(
        &self,
        session: &QuizSession,
        tally: FinishTally,
    ) -> Result<QuizResult, QuizError> {
        let total = u32::try_from(session.question_count()).unwrap_or(u32::MAX);
        let score = self
            .progress
            .complete(session.test_id(), total, tally.correct, tally.wrong)
            .await?;
        debug!(
            test_id = %session.test_id(),
            correct = tally.correct,
            wrong = tally.wrong,
            empty = tally.empty,
            score,
            "quiz session finished"
        );
        Ok(QuizResult { tally, score })
    }
}
