mod flashcard;
mod ids;
mod progress;
mod review;
mod test;

pub use flashcard::{FlashcardLearning, LearningStatus, ParseStatusError};
pub use ids::{ParseLetterError, QuestionKey, TestId};
pub use progress::{FinishTally, TestProgress, TestProgressError};
pub use review::{MistakeQuestion, SavedQuestion};
pub use test::{
    OptionLetter, Question, QuestionKind, QuestionOption, TestData, TestError, TestMetadata,
};
