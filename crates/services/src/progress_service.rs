//! Progress reads and writes on top of the progress repository.
//!
//! Every mutation is a read-modify-write of one test's record, serialized
//! through an async mutex so concurrent callers cannot interleave and lose
//! counter updates.

use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{OptionLetter, TestId, TestProgress};
use storage::repository::ProgressRepository;
use tokio::sync::Mutex;

use crate::error::ProgressServiceError;

/// Aggregate counters across every progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudyStats {
    pub total_answered: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub completed_tests: u32,
    pub passed_tests: u32,
}

pub struct ProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    write_guard: Mutex<()>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            progress,
            write_guard: Mutex::new(()),
        }
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn get(&self, test_id: &TestId) -> Result<Option<TestProgress>, ProgressServiceError> {
        Ok(self.progress.get_progress(test_id).await?)
    }

    /// All progress records, most recently answered first.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn list(&self) -> Result<Vec<TestProgress>, ProgressServiceError> {
        Ok(self.progress.list_progress().await?)
    }

    /// Record one answer, creating the progress record on first write.
    ///
    /// Re-answering an index updates the stored letter without moving the
    /// counters.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn record_answer(
        &self,
        test_id: &TestId,
        total_question_count: u32,
        question_index: u32,
        letter: OptionLetter,
        is_correct: bool,
    ) -> Result<TestProgress, ProgressServiceError> {
        let _guard = self.write_guard.lock().await;
        let mut record = self.get_or_new(test_id, total_question_count).await?;
        record.record_answer(question_index, letter, is_correct, self.clock.now());
        self.progress.upsert_progress(&record).await?;
        Ok(record)
    }

    /// Remember the question the user is currently on.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn save_position(
        &self,
        test_id: &TestId,
        total_question_count: u32,
        question_index: u32,
    ) -> Result<(), ProgressServiceError> {
        let _guard = self.write_guard.lock().await;
        let mut record = self.get_or_new(test_id, total_question_count).await?;
        record.set_position(question_index, self.clock.now());
        self.progress.upsert_progress(&record).await?;
        Ok(())
    }

    /// Mark a test completed with final tallies and return its score.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn complete(
        &self,
        test_id: &TestId,
        total_question_count: u32,
        correct: u32,
        wrong: u32,
    ) -> Result<u8, ProgressServiceError> {
        let _guard = self.write_guard.lock().await;
        let mut record = self.get_or_new(test_id, total_question_count).await?;
        record.complete(correct, wrong, self.clock.now());
        self.progress.upsert_progress(&record).await?;
        Ok(record.score().unwrap_or(0))
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn delete(&self, test_id: &TestId) -> Result<(), ProgressServiceError> {
        Ok(self.progress.delete_progress(test_id).await?)
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn clear(&self) -> Result<(), ProgressServiceError> {
        Ok(self.progress.clear_progress().await?)
    }

    /// Lifetime study statistics across every test.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn stats(&self) -> Result<StudyStats, ProgressServiceError> {
        let mut stats = StudyStats::default();
        for record in self.progress.list_progress().await? {
            stats.total_answered += record.answered_count();
            stats.total_correct += record.correct_count();
            stats.total_wrong += record.wrong_count();
            if record.is_completed() {
                stats.completed_tests += 1;
                if record.is_passed() {
                    stats.passed_tests += 1;
                }
            }
        }
        Ok(stats)
    }

    async fn get_or_new(
        &self,
        test_id: &TestId,
        total_question_count: u32,
    ) -> Result<TestProgress, ProgressServiceError> {
        Ok(self
            .progress
            .get_progress(test_id)
            .await?
            .unwrap_or_else(|| {
                TestProgress::new(test_id.clone(), total_question_count, self.clock.now())
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn service() -> (ProgressService, Arc<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        let service = ProgressService::new(fixed_clock(), repo.clone());
        (service, repo)
    }

    #[tokio::test]
    async fn first_answer_creates_the_record() {
        let (service, _repo) = service();
        let id = TestId::new("test_1");

        let record = service
            .record_answer(&id, 50, 0, OptionLetter::A, true)
            .await
            .unwrap();
        assert_eq!(record.answered_count(), 1);
        assert_eq!(record.correct_count(), 1);
        assert_eq!(service.get(&id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn re_answer_updates_letter_without_recounting() {
        let (service, _repo) = service();
        let id = TestId::new("test_1");

        service
            .record_answer(&id, 50, 3, OptionLetter::A, true)
            .await
            .unwrap();
        let record = service
            .record_answer(&id, 50, 3, OptionLetter::D, false)
            .await
            .unwrap();

        assert_eq!(record.answered_count(), 1);
        assert_eq!(record.correct_count(), 1);
        assert_eq!(record.wrong_count(), 0);
        assert_eq!(record.answer_for(3), Some(OptionLetter::D));
    }

    #[tokio::test]
    async fn complete_returns_truncated_score() {
        let (service, _repo) = service();
        let id = TestId::new("test_1");

        let score = service.complete(&id, 3, 1, 2).await.unwrap();
        assert_eq!(score, 33);

        let record = service.get(&id).await.unwrap().unwrap();
        assert!(record.is_completed());
        assert_eq!(record.score(), Some(33));
    }

    #[tokio::test]
    async fn stats_aggregate_across_tests() {
        let (service, _repo) = service();

        service
            .record_answer(&TestId::new("a"), 10, 0, OptionLetter::A, true)
            .await
            .unwrap();
        service
            .record_answer(&TestId::new("a"), 10, 1, OptionLetter::B, false)
            .await
            .unwrap();
        service.complete(&TestId::new("b"), 10, 8, 2).await.unwrap();
        service.complete(&TestId::new("c"), 10, 3, 7).await.unwrap();

        let stats = service.stats().await.unwrap();
        // Completed tallies count as answered even without per-index records.
        assert_eq!(stats.total_answered, 2 + 10 + 10);
        assert_eq!(stats.total_correct, 1 + 8 + 3);
        assert_eq!(stats.total_wrong, 1 + 2 + 7);
        assert_eq!(stats.completed_tests, 2);
        assert_eq!(stats.passed_tests, 1);
    }
}
