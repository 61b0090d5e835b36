//! Pass-probability estimate over the stored study history.

use std::sync::Arc;

use exam_core::prediction::{self, PredictionResult};
use storage::repository::{FlashcardRepository, ProgressRepository};

use crate::error::PredictionError;

pub struct PredictionService {
    progress: Arc<dyn ProgressRepository>,
    flashcards: Arc<dyn FlashcardRepository>,
}

impl PredictionService {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        flashcards: Arc<dyn FlashcardRepository>,
    ) -> Self {
        Self {
            progress,
            flashcards,
        }
    }

    /// Estimate the pass probability from all stored progress and flashcard
    /// learning records.
    ///
    /// # Errors
    ///
    /// Returns `PredictionError` on storage failures.
    pub async fn predict(&self) -> Result<PredictionResult, PredictionError> {
        let progress = self.progress.list_progress().await?;
        let learned = self.flashcards.learned_count().await?;
        Ok(prediction::calculate(&progress, learned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{OptionLetter, TestId, TestProgress};
    use exam_core::prediction::PredictionConfidence;
    use exam_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, ProgressRepository};

    #[tokio::test]
    async fn no_history_yields_zero_with_low_confidence() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = PredictionService::new(repo.clone(), repo);

        let result = service.predict().await.unwrap();
        assert_eq!(result.pass_percentage, 0);
        assert_eq!(result.confidence, PredictionConfidence::Low);
    }

    #[tokio::test]
    async fn predict_reads_progress_and_flashcards() {
        let repo = Arc::new(InMemoryRepository::new());
        let now = fixed_now();

        let mut progress = TestProgress::new(TestId::new("t1"), 50, now);
        for i in 0..8 {
            progress.record_answer(i, OptionLetter::A, true, now);
        }
        for i in 8..10 {
            progress.record_answer(i, OptionLetter::B, false, now);
        }
        repo.upsert_progress(&progress).await.unwrap();

        let service = PredictionService::new(repo.clone(), repo);
        let result = service.predict().await.unwrap();

        assert_eq!(result.total_answered, 10);
        assert_eq!(result.total_correct, 8);
        assert!(result.pass_percentage > 0);
    }
}
