//! Flashcard learning records, consumed by the pass-probability estimate.

use std::sync::Arc;

use exam_core::Clock;
use exam_core::model::{FlashcardLearning, LearningStatus};
use storage::repository::FlashcardRepository;

use crate::error::FlashcardError;

pub struct FlashcardService {
    clock: Clock,
    flashcards: Arc<dyn FlashcardRepository>,
}

impl FlashcardService {
    #[must_use]
    pub fn new(clock: Clock, flashcards: Arc<dyn FlashcardRepository>) -> Self {
        Self { clock, flashcards }
    }

    /// Record or update the learning status of one card.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError` on storage failures.
    pub async fn mark_card(
        &self,
        category_id: &str,
        card_id: &str,
        description: &str,
        status: LearningStatus,
    ) -> Result<(), FlashcardError> {
        let card = FlashcardLearning::new(
            category_id,
            card_id,
            description,
            status,
            self.clock.now(),
        );
        self.flashcards.upsert_flashcard(&card).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `FlashcardError` on storage failures.
    pub async fn list(&self) -> Result<Vec<FlashcardLearning>, FlashcardError> {
        Ok(self.flashcards.list_flashcards().await?)
    }

    /// # Errors
    ///
    /// Returns `FlashcardError` on storage failures.
    pub async fn learned_count(&self) -> Result<u32, FlashcardError> {
        Ok(self.flashcards.learned_count().await?)
    }
}
