//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::TestId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReviewService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewError {
    #[error("no test in the catalog for {0}")]
    ContentNotFound(TestId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session engine and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no test in the catalog for {0}")]
    ContentNotFound(TestId),

    #[error("test has no questions")]
    Empty,

    #[error("answer already checked for this question")]
    AlreadyChecked,

    #[error("no answer selected")]
    NoSelection,

    #[error("quiz already completed")]
    Completed,

    #[error(transparent)]
    Progress(#[from] ProgressServiceError),

    #[error(transparent)]
    Review(#[from] ReviewError),
}

/// Errors emitted by `PredictionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PredictionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `FlashcardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
