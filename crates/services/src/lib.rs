#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod flashcard_service;
pub mod prediction_service;
pub mod progress_service;
pub mod quiz;
pub mod review_service;

pub use exam_core::Clock;

pub use app_services::AppServices;
pub use catalog::{ContentCatalog, InMemoryCatalog};
pub use error::{
    AppServicesError, FlashcardError, PredictionError, ProgressServiceError, QuizError,
    ReviewError,
};
pub use flashcard_service::FlashcardService;
pub use prediction_service::PredictionService;
pub use progress_service::{ProgressService, StudyStats};
pub use quiz::{
    Advance, AdvanceOutcome, AnswerState, ButtonState, CheckedAnswer, CloseAction, QuizResult,
    QuizService, QuizSession, QuizSnapshot,
};
pub use review_service::{ReviewItem, ReviewService};
