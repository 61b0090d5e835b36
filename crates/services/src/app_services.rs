//! Wires storage, catalog, and clock into the service layer.
//!
//! All dependencies come in through constructors; nothing here reaches for
//! process-global state, so tests can assemble the whole stack on an
//! in-memory backend with a fixed clock.

use std::sync::Arc;

use tracing::info;

use exam_core::Clock;
use storage::repository::Storage;

use crate::catalog::ContentCatalog;
use crate::error::AppServicesError;
use crate::flashcard_service::FlashcardService;
use crate::prediction_service::PredictionService;
use crate::progress_service::ProgressService;
use crate::quiz::QuizService;
use crate::review_service::ReviewService;

/// The assembled service layer.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    progress: Arc<ProgressService>,
    quiz: Arc<QuizService>,
    reviews: Arc<ReviewService>,
    flashcards: Arc<FlashcardService>,
    prediction: Arc<PredictionService>,
}

impl AppServices {
    /// Assemble against a SQLite database, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the database cannot be opened or
    /// migrated.
    pub async fn new_sqlite(
        database_url: &str,
        catalog: Arc<dyn ContentCatalog>,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        Ok(Self::assemble(storage, catalog, clock))
    }

    /// Assemble on the in-memory backend, for tests and previews.
    #[must_use]
    pub fn in_memory(catalog: Arc<dyn ContentCatalog>, clock: Clock) -> Self {
        Self::assemble(Storage::in_memory(), catalog, clock)
    }

    fn assemble(storage: Storage, catalog: Arc<dyn ContentCatalog>, clock: Clock) -> Self {
        let progress = Arc::new(ProgressService::new(clock, storage.progress.clone()));
        let reviews = Arc::new(ReviewService::new(
            clock,
            catalog.clone(),
            storage.progress.clone(),
            storage.saved.clone(),
            storage.mistakes.clone(),
        ));
        let quiz = Arc::new(QuizService::new(
            catalog,
            progress.clone(),
            reviews.clone(),
        ));
        let flashcards = Arc::new(FlashcardService::new(clock, storage.flashcards.clone()));
        let prediction = Arc::new(PredictionService::new(
            storage.progress.clone(),
            storage.flashcards.clone(),
        ));

        Self {
            storage,
            progress,
            quiz,
            reviews,
            flashcards,
            prediction,
        }
    }

    #[must_use]
    pub fn progress(&self) -> &Arc<ProgressService> {
        &self.progress
    }

    #[must_use]
    pub fn quiz(&self) -> &Arc<QuizService> {
        &self.quiz
    }

    #[must_use]
    pub fn reviews(&self) -> &Arc<ReviewService> {
        &self.reviews
    }

    #[must_use]
    pub fn flashcards(&self) -> &Arc<FlashcardService> {
        &self.flashcards
    }

    #[must_use]
    pub fn prediction(&self) -> &Arc<PredictionService> {
        &self.prediction
    }

    /// Wipe every user-generated record: progress, bookmarks, mistakes,
    /// and flashcard learning state.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` on storage failures.
    pub async fn clear_all_data(&self) -> Result<(), AppServicesError> {
        self.storage.progress.clear_progress().await?;
        self.storage.saved.clear_saved().await?;
        self.storage.mistakes.clear_mistakes().await?;
        self.storage.flashcards.clear_flashcards().await?;
        info!("cleared all user data");
        Ok(())
    }
}
