use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::{OptionLetter, TestId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestProgressError {
    #[error("answered counters ({correct} + {wrong}) do not match map size {answered}")]
    CountMismatch {
        correct: u32,
        wrong: u32,
        answered: u32,
    },

    #[error("score set on a test that is not completed")]
    ScoreWithoutCompletion,

    #[error("last question index {index} out of range for {total} questions")]
    IndexOutOfRange { index: u32, total: u32 },
}

/// Per-question correctness tally, distinguishing empty from wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishTally {
    pub correct: u32,
    pub wrong: u32,
    pub empty: u32,
}

/// Durable record of a user's answers and completion state for one test.
///
/// The answered map is keyed by question index; counters are incremented only
/// the first time an index receives an answer, so re-answering never
/// double-counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestProgress {
    test_id: TestId,
    total_question_count: u32,
    answered: BTreeMap<u32, OptionLetter>,
    answered_count: u32,
    correct_count: u32,
    wrong_count: u32,
    last_question_index: u32,
    is_completed: bool,
    score: Option<u8>,
    started_at: DateTime<Utc>,
    last_answered_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TestProgress {
    /// Fresh progress for a test that has just been started.
    #[must_use]
    pub fn new(test_id: TestId, total_question_count: u32, now: DateTime<Utc>) -> Self {
        Self {
            test_id,
            total_question_count,
            answered: BTreeMap::new(),
            answered_count: 0,
            correct_count: 0,
            wrong_count: 0,
            last_question_index: 0,
            is_completed: false,
            score: None,
            started_at: now,
            last_answered_at: now,
            completed_at: None,
        }
    }

    /// Rehydrate a progress record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `TestProgressError` if the counters, score, or index violate
    /// the record's invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        test_id: TestId,
        total_question_count: u32,
        answered: BTreeMap<u32, OptionLetter>,
        correct_count: u32,
        wrong_count: u32,
        last_question_index: u32,
        is_completed: bool,
        score: Option<u8>,
        started_at: DateTime<Utc>,
        last_answered_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, TestProgressError> {
        let map_len = u32::try_from(answered.len()).unwrap_or(u32::MAX);
        // For a completed test the finishing tally is authoritative; the
        // stored map may hold answers for questions the content no longer
        // has, so its size is only checked while the test is in progress.
        if !is_completed && correct_count + wrong_count != map_len {
            return Err(TestProgressError::CountMismatch {
                correct: correct_count,
                wrong: wrong_count,
                answered: map_len,
            });
        }
        let answered_count = if is_completed {
            correct_count + wrong_count
        } else {
            map_len
        };
        if score.is_some() && !is_completed {
            return Err(TestProgressError::ScoreWithoutCompletion);
        }
        if total_question_count > 0 && last_question_index >= total_question_count {
            return Err(TestProgressError::IndexOutOfRange {
                index: last_question_index,
                total: total_question_count,
            });
        }

        Ok(Self {
            test_id,
            total_question_count,
            answered,
            answered_count,
            correct_count,
            wrong_count,
            last_question_index,
            is_completed,
            score,
            started_at,
            last_answered_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn test_id(&self) -> &TestId {
        &self.test_id
    }

    #[must_use]
    pub fn total_question_count(&self) -> u32 {
        self.total_question_count
    }

    #[must_use]
    pub fn answered(&self) -> &BTreeMap<u32, OptionLetter> {
        &self.answered
    }

    #[must_use]
    pub fn answer_for(&self, question_index: u32) -> Option<OptionLetter> {
        self.answered.get(&question_index).copied()
    }

    #[must_use]
    pub fn answered_count(&self) -> u32 {
        self.answered_count
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    /// Questions with no stored answer. Empty is not wrong.
    #[must_use]
    pub fn empty_count(&self) -> u32 {
        self.total_question_count.saturating_sub(self.answered_count)
    }

    #[must_use]
    pub fn last_question_index(&self) -> u32 {
        self.last_question_index
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[must_use]
    pub fn score(&self) -> Option<u8> {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn last_answered_at(&self) -> DateTime<Utc> {
        self.last_answered_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Whether this completed test reached the 70% pass bar over its
    /// answered questions.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        if !self.is_completed {
            return false;
        }
        let total = self.correct_count + self.wrong_count;
        if total == 0 {
            return false;
        }
        f64::from(self.correct_count) / f64::from(total) >= crate::prediction::PASS_THRESHOLD
    }

    /// Index to resume at for a test that currently has `question_count`
    /// questions, clamped in case content changed between sessions.
    #[must_use]
    pub fn resume_index(&self, question_count: usize) -> usize {
        if question_count == 0 {
            return 0;
        }
        (self.last_question_index as usize).min(question_count - 1)
    }

    /// Record an answer for a question index.
    ///
    /// Counters move only the first time an index is answered; a repeat
    /// answer updates the stored letter without double-counting.
    pub fn record_answer(
        &mut self,
        question_index: u32,
        letter: OptionLetter,
        is_correct: bool,
        now: DateTime<Utc>,
    ) {
        let was_answered = self.answered.insert(question_index, letter).is_some();
        if !was_answered {
            self.answered_count += 1;
            if is_correct {
                self.correct_count += 1;
            } else {
                self.wrong_count += 1;
            }
        }
        self.last_answered_at = now;
    }

    /// Remember where the user left off. Stamps `last_answered_at` the way
    /// every progress write does.
    pub fn set_position(&mut self, question_index: u32, now: DateTime<Utc>) {
        self.last_question_index = question_index;
        self.last_answered_at = now;
    }

    /// Mark the test completed with the final tallies.
    ///
    /// The tally is authoritative: `answered_count` is reset to
    /// `correct + wrong`, since the stored map can hold answers for
    /// questions the content no longer has. The score is
    /// `100 * correct / (correct + wrong)` truncated toward zero, or 0 when
    /// nothing was answered.
    pub fn complete(&mut self, correct: u32, wrong: u32, now: DateTime<Utc>) {
        self.is_completed = true;
        self.answered_count = correct + wrong;
        self.correct_count = correct;
        self.wrong_count = wrong;
        self.completed_at = Some(now);
        self.last_answered_at = now;

        let total = correct + wrong;
        let score = if total > 0 { 100 * correct / total } else { 0 };
        self.score = Some(u8::try_from(score).unwrap_or(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn progress(total: u32) -> TestProgress {
        TestProgress::new(TestId::new("test_1"), total, fixed_now())
    }

    #[test]
    fn re_answering_same_index_does_not_double_count() {
        let mut p = progress(10);
        p.record_answer(3, OptionLetter::A, true, fixed_now());
        p.record_answer(3, OptionLetter::B, false, fixed_now());

        assert_eq!(p.answered_count(), 1);
        assert_eq!(p.correct_count(), 1);
        assert_eq!(p.wrong_count(), 0);
        assert_eq!(p.answer_for(3), Some(OptionLetter::B));
    }

    #[test]
    fn score_truncates_toward_zero() {
        let mut p = progress(10);
        p.complete(7, 3, fixed_now());
        assert_eq!(p.score(), Some(70));

        let mut p = progress(3);
        p.complete(1, 2, fixed_now());
        assert_eq!(p.score(), Some(33));
    }

    #[test]
    fn zero_answers_scores_zero() {
        let mut p = progress(10);
        p.complete(0, 0, fixed_now());
        assert_eq!(p.score(), Some(0));
        assert!(p.is_completed());
        assert!(!p.is_passed());
    }

    #[test]
    fn unanswered_questions_count_as_empty_not_wrong() {
        let mut p = progress(10);
        p.record_answer(0, OptionLetter::A, true, fixed_now());
        p.record_answer(1, OptionLetter::B, true, fixed_now());
        p.record_answer(2, OptionLetter::C, true, fixed_now());
        p.record_answer(3, OptionLetter::D, false, fixed_now());

        assert_eq!(p.correct_count(), 3);
        assert_eq!(p.wrong_count(), 1);
        assert_eq!(p.empty_count(), 6);
    }

    #[test]
    fn resume_index_clamps_when_content_shrank() {
        let p = TestProgress::from_persisted(
            TestId::new("test_1"),
            50,
            BTreeMap::new(),
            0,
            0,
            49,
            false,
            None,
            fixed_now(),
            fixed_now(),
            None,
        )
        .unwrap();

        assert_eq!(p.resume_index(30), 29);
        assert_eq!(p.resume_index(50), 49);
        assert_eq!(p.resume_index(0), 0);
    }

    #[test]
    fn completed_record_survives_answers_outside_the_tally() {
        let mut p = progress(50);
        p.record_answer(49, OptionLetter::A, true, fixed_now());
        // Content shrank before the finish, so the tally excludes index 49.
        p.complete(0, 0, fixed_now());
        assert_eq!(p.answered_count(), 0);

        let rehydrated = TestProgress::from_persisted(
            p.test_id().clone(),
            p.total_question_count(),
            p.answered().clone(),
            p.correct_count(),
            p.wrong_count(),
            p.last_question_index(),
            p.is_completed(),
            p.score(),
            p.started_at(),
            p.last_answered_at(),
            p.completed_at(),
        )
        .unwrap();
        assert_eq!(rehydrated, p);
        assert_eq!(rehydrated.answer_for(49), Some(OptionLetter::A));
    }

    #[test]
    fn from_persisted_rejects_count_mismatch() {
        let mut answered = BTreeMap::new();
        answered.insert(0, OptionLetter::A);
        let err = TestProgress::from_persisted(
            TestId::new("t"),
            10,
            answered,
            2,
            1,
            0,
            false,
            None,
            fixed_now(),
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, TestProgressError::CountMismatch { .. }));
    }

    #[test]
    fn from_persisted_rejects_score_without_completion() {
        let err = TestProgress::from_persisted(
            TestId::new("t"),
            10,
            BTreeMap::new(),
            0,
            0,
            0,
            false,
            Some(80),
            fixed_now(),
            fixed_now(),
            None,
        )
        .unwrap_err();
        assert_eq!(err, TestProgressError::ScoreWithoutCompletion);
    }

    #[test]
    fn pass_bar_is_seventy_percent_of_answered() {
        let mut p = progress(10);
        p.complete(7, 3, fixed_now());
        assert!(p.is_passed());

        let mut p = progress(10);
        p.complete(6, 4, fixed_now());
        assert!(!p.is_passed());
    }
}
