use async_trait::async_trait;
use exam_core::model::{
    FlashcardLearning, LearningStatus, MistakeQuestion, QuestionKey, SavedQuestion, TestId,
    TestProgress,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for test progress records.
///
/// The backing store is supplied at construction; operations fail loudly
/// with `StorageError` rather than degrading to silent no-ops.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch progress for a test, `None` if the test was never started.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_progress(&self, test_id: &TestId) -> Result<Option<TestProgress>, StorageError>;

    /// Insert or fully overwrite the record for this test id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn upsert_progress(&self, progress: &TestProgress) -> Result<(), StorageError>;

    /// Delete one test's progress. Deleting a missing record is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn delete_progress(&self, test_id: &TestId) -> Result<(), StorageError>;

    /// All progress records, most recently answered first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_progress(&self) -> Result<Vec<TestProgress>, StorageError>;

    /// Remove every progress record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear_progress(&self) -> Result<(), StorageError>;
}

/// Repository contract for user-bookmarked questions.
#[async_trait]
pub trait SavedQuestionRepository: Send + Sync {
    async fn is_saved(&self, key: &QuestionKey) -> Result<bool, StorageError>;

    /// Insert if absent; saving an already-saved question is a no-op.
    async fn save_question(&self, question: &SavedQuestion) -> Result<(), StorageError>;

    async fn delete_saved(&self, key: &QuestionKey) -> Result<(), StorageError>;

    /// All saved questions, newest first.
    async fn list_saved(&self) -> Result<Vec<SavedQuestion>, StorageError>;

    async fn saved_count(&self) -> Result<u64, StorageError>;

    async fn clear_saved(&self) -> Result<(), StorageError>;
}

/// Repository contract for the currently-wrong question set.
#[async_trait]
pub trait MistakeRepository: Send + Sync {
    /// Insert or refresh (answer + timestamp) the entry for this key.
    async fn upsert_mistake(&self, mistake: &MistakeQuestion) -> Result<(), StorageError>;

    async fn delete_mistake(&self, key: &QuestionKey) -> Result<(), StorageError>;

    /// All mistakes, newest first.
    async fn list_mistakes(&self) -> Result<Vec<MistakeQuestion>, StorageError>;

    async fn mistake_count(&self) -> Result<u64, StorageError>;

    async fn clear_mistakes(&self) -> Result<(), StorageError>;
}

/// Repository contract for flashcard learning records.
#[async_trait]
pub trait FlashcardRepository: Send + Sync {
    /// Insert or overwrite the record for (category, card).
    async fn upsert_flashcard(&self, card: &FlashcardLearning) -> Result<(), StorageError>;

    /// All flashcard records, newest first.
    async fn list_flashcards(&self) -> Result<Vec<FlashcardLearning>, StorageError>;

    /// Number of cards marked learned.
    async fn learned_count(&self) -> Result<u32, StorageError>;

    async fn clear_flashcards(&self) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<TestId, TestProgress>>>,
    saved: Arc<Mutex<HashMap<QuestionKey, SavedQuestion>>>,
    mistakes: Arc<Mutex<HashMap<QuestionKey, MistakeQuestion>>>,
    flashcards: Arc<Mutex<HashMap<(String, String), FlashcardLearning>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<T>(guard: &Arc<Mutex<T>>) -> Result<std::sync::MutexGuard<'_, T>, StorageError> {
        guard
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, test_id: &TestId) -> Result<Option<TestProgress>, StorageError> {
        Ok(Self::lock(&self.progress)?.get(test_id).cloned())
    }

    async fn upsert_progress(&self, progress: &TestProgress) -> Result<(), StorageError> {
        Self::lock(&self.progress)?.insert(progress.test_id().clone(), progress.clone());
        Ok(())
    }

    async fn delete_progress(&self, test_id: &TestId) -> Result<(), StorageError> {
        Self::lock(&self.progress)?.remove(test_id);
        Ok(())
    }

    async fn list_progress(&self) -> Result<Vec<TestProgress>, StorageError> {
        let mut all: Vec<TestProgress> = Self::lock(&self.progress)?.values().cloned().collect();
        all.sort_by(|a, b| b.last_answered_at().cmp(&a.last_answered_at()));
        Ok(all)
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        Self::lock(&self.progress)?.clear();
        Ok(())
    }
}

#[async_trait]
impl SavedQuestionRepository for InMemoryRepository {
    async fn is_saved(&self, key: &QuestionKey) -> Result<bool, StorageError> {
        Ok(Self::lock(&self.saved)?.contains_key(key))
    }

    async fn save_question(&self, question: &SavedQuestion) -> Result<(), StorageError> {
        Self::lock(&self.saved)?
            .entry(question.key.clone())
            .or_insert_with(|| question.clone());
        Ok(())
    }

    async fn delete_saved(&self, key: &QuestionKey) -> Result<(), StorageError> {
        Self::lock(&self.saved)?.remove(key);
        Ok(())
    }

    async fn list_saved(&self) -> Result<Vec<SavedQuestion>, StorageError> {
        let mut all: Vec<SavedQuestion> = Self::lock(&self.saved)?.values().cloned().collect();
        all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(all)
    }

    async fn saved_count(&self) -> Result<u64, StorageError> {
        Ok(Self::lock(&self.saved)?.len() as u64)
    }

    async fn clear_saved(&self) -> Result<(), StorageError> {
        Self::lock(&self.saved)?.clear();
        Ok(())
    }
}

#[async_trait]
impl MistakeRepository for InMemoryRepository {
    async fn upsert_mistake(&self, mistake: &MistakeQuestion) -> Result<(), StorageError> {
        Self::lock(&self.mistakes)?.insert(mistake.key.clone(), mistake.clone());
        Ok(())
    }

    async fn delete_mistake(&self, key: &QuestionKey) -> Result<(), StorageError> {
        Self::lock(&self.mistakes)?.remove(key);
        Ok(())
    }

    async fn list_mistakes(&self) -> Result<Vec<MistakeQuestion>, StorageError> {
        let mut all: Vec<MistakeQuestion> = Self::lock(&self.mistakes)?.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn mistake_count(&self) -> Result<u64, StorageError> {
        Ok(Self::lock(&self.mistakes)?.len() as u64)
    }

    async fn clear_mistakes(&self) -> Result<(), StorageError> {
        Self::lock(&self.mistakes)?.clear();
        Ok(())
    }
}

#[async_trait]
impl FlashcardRepository for InMemoryRepository {
    async fn upsert_flashcard(&self, card: &FlashcardLearning) -> Result<(), StorageError> {
        Self::lock(&self.flashcards)?.insert(
            (card.category_id.clone(), card.card_id.clone()),
            card.clone(),
        );
        Ok(())
    }

    async fn list_flashcards(&self) -> Result<Vec<FlashcardLearning>, StorageError> {
        let mut all: Vec<FlashcardLearning> =
            Self::lock(&self.flashcards)?.values().cloned().collect();
        all.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(all)
    }

    async fn learned_count(&self) -> Result<u32, StorageError> {
        let count = Self::lock(&self.flashcards)?
            .values()
            .filter(|c| c.status == LearningStatus::Learned)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn clear_flashcards(&self) -> Result<(), StorageError> {
        Self::lock(&self.flashcards)?.clear();
        Ok(())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub saved: Arc<dyn SavedQuestionRepository>,
    pub mistakes: Arc<dyn MistakeRepository>,
    pub flashcards: Arc<dyn FlashcardRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            progress: Arc::new(repo.clone()),
            saved: Arc::new(repo.clone()),
            mistakes: Arc::new(repo.clone()),
            flashcards: Arc::new(repo),
        }
    }
}
