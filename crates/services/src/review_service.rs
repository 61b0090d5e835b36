//! Bookmarks, the mistake notebook, and per-test answer review.

use std::sync::Arc;

use tracing::debug;

use exam_core::Clock;
use exam_core::model::{
    MistakeQuestion, OptionLetter, QuestionKey, SavedQuestion, TestId,
};
use storage::repository::{MistakeRepository, ProgressRepository, SavedQuestionRepository};

use crate::catalog::ContentCatalog;
use crate::error::ReviewError;

/// One answered question in a test's review list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub key: QuestionKey,
    pub question_text: String,
    pub main_image: Option<String>,
    pub category_id: String,
    pub selected: OptionLetter,
    pub correct_answer: OptionLetter,
    pub is_correct: bool,
    pub is_saved: bool,
}

pub struct ReviewService {
    clock: Clock,
    catalog: Arc<dyn ContentCatalog>,
    progress: Arc<dyn ProgressRepository>,
    saved: Arc<dyn SavedQuestionRepository>,
    mistakes: Arc<dyn MistakeRepository>,
}

impl ReviewService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<dyn ContentCatalog>,
        progress: Arc<dyn ProgressRepository>,
        saved: Arc<dyn SavedQuestionRepository>,
        mistakes: Arc<dyn MistakeRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            progress,
            saved,
            mistakes,
        }
    }

    //
    // ─── SAVED QUESTIONS ───────────────────────────────────────────────────────
    //

    /// Flip the bookmark on a question; returns the new saved state.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn toggle_saved(
        &self,
        key: &QuestionKey,
        question_text: &str,
    ) -> Result<bool, ReviewError> {
        if self.saved.is_saved(key).await? {
            self.saved.delete_saved(key).await?;
            Ok(false)
        } else {
            let question = SavedQuestion::new(key.clone(), question_text, self.clock.now());
            self.saved.save_question(&question).await?;
            Ok(true)
        }
    }

    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn is_saved(&self, key: &QuestionKey) -> Result<bool, ReviewError> {
        Ok(self.saved.is_saved(key).await?)
    }

    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn list_saved(&self) -> Result<Vec<SavedQuestion>, ReviewError> {
        Ok(self.saved.list_saved().await?)
    }

    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn saved_count(&self) -> Result<u64, ReviewError> {
        Ok(self.saved.saved_count().await?)
    }

    //
    // ─── MISTAKES ──────────────────────────────────────────────────────────────
    //

    /// Record a wrong answer. A repeat mistake on the same question keeps
    /// one entry, refreshed with the latest answer and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn record_mistake(
        &self,
        key: &QuestionKey,
        question_text: &str,
        user_answer: OptionLetter,
        correct_answer: OptionLetter,
    ) -> Result<(), ReviewError> {
        let mistake = MistakeQuestion::new(
            key.clone(),
            question_text,
            user_answer,
            correct_answer,
            self.clock.now(),
        );
        self.mistakes.upsert_mistake(&mistake).await?;
        Ok(())
    }

    /// Drop a question from the mistake notebook, typically once the user
    /// answers it correctly during mistake practice.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn clear_mistake(&self, key: &QuestionKey) -> Result<(), ReviewError> {
        Ok(self.mistakes.delete_mistake(key).await?)
    }

    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn list_mistakes(&self) -> Result<Vec<MistakeQuestion>, ReviewError> {
        Ok(self.mistakes.list_mistakes().await?)
    }

    /// # Errors
    ///
    /// Returns `ReviewError` on storage failures.
    pub async fn mistake_count(&self) -> Result<u64, ReviewError> {
        Ok(self.mistakes.mistake_count().await?)
    }

    //
    // ─── ANSWER REVIEW ─────────────────────────────────────────────────────────
    //

    /// Answered questions of one test, optionally filtered by category,
    /// joined against the stored answers and bookmarks.
    ///
    /// A test that was never started yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ContentNotFound` for an unknown test id, `Storage` on
    /// backend failures.
    pub async fn review_list(
        &self,
        test_id: &TestId,
        category: Option<&str>,
    ) -> Result<Vec<ReviewItem>, ReviewError> {
        let test = self
            .catalog
            .load_test(test_id)
            .await
            .ok_or_else(|| ReviewError::ContentNotFound(test_id.clone()))?;

        let Some(progress) = self.progress.get_progress(test_id).await? else {
            debug!(test_id = %test_id, "review requested for an unstarted test");
            return Ok(Vec::new());
        };

        let mut items = Vec::new();
        for (index, question) in test.questions().iter().enumerate() {
            let index = index as u32;
            let Some(selected) = progress.answer_for(index) else {
                continue;
            };
            if category.is_some_and(|c| c != question.category_id()) {
                continue;
            }
            let key = QuestionKey::new(test_id.clone(), index);
            let is_saved = self.saved.is_saved(&key).await?;
            items.push(ReviewItem {
                key,
                question_text: question.text().to_string(),
                main_image: question.main_image().map(str::to_string),
                category_id: question.category_id().to_string(),
                selected,
                correct_answer: question.correct_answer(),
                is_correct: question.is_correct(selected),
                is_saved,
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{
        Question, QuestionKind, QuestionOption, TestData, TestProgress,
    };
    use exam_core::time::{fixed_clock, fixed_now};
    use storage::repository::{InMemoryRepository, ProgressRepository};

    fn question(id: &str, order: u32, category: &str, correct: OptionLetter) -> Question {
        let options = OptionLetter::ALL
            .into_iter()
            .map(|l| QuestionOption::new(l, format!("option {l}")))
            .collect();
        Question::new(
            id,
            order,
            category,
            format!("question {order}"),
            QuestionKind::Text,
            options,
            correct,
            "",
            None,
            None,
        )
        .unwrap()
    }

    fn service_with_test() -> (ReviewService, Arc<InMemoryRepository>, TestId) {
        let id = TestId::new("test_1");
        let test = TestData::new(
            id.clone(),
            1,
            "Test 1",
            vec![
                question("q0", 1, "traffic", OptionLetter::A),
                question("q1", 2, "signs", OptionLetter::B),
                question("q2", 3, "traffic", OptionLetter::C),
            ],
        );
        let mut catalog = crate::catalog::InMemoryCatalog::new();
        catalog.add_test(test, "mixed", false);

        let repo = Arc::new(InMemoryRepository::new());
        let service = ReviewService::new(
            fixed_clock(),
            Arc::new(catalog),
            repo.clone(),
            repo.clone(),
            repo.clone(),
        );
        (service, repo, id)
    }

    #[tokio::test]
    async fn toggle_saved_flips_state() {
        let (service, _repo, id) = service_with_test();
        let key = QuestionKey::new(id, 0);

        assert!(service.toggle_saved(&key, "Q").await.unwrap());
        assert!(service.is_saved(&key).await.unwrap());
        assert_eq!(service.saved_count().await.unwrap(), 1);

        assert!(!service.toggle_saved(&key, "Q").await.unwrap());
        assert!(!service.is_saved(&key).await.unwrap());
    }

    #[tokio::test]
    async fn repeat_mistake_keeps_one_entry_with_latest_answer() {
        let (service, _repo, id) = service_with_test();
        let key = QuestionKey::new(id, 1);

        service
            .record_mistake(&key, "Q", OptionLetter::C, OptionLetter::B)
            .await
            .unwrap();
        service
            .record_mistake(&key, "Q", OptionLetter::D, OptionLetter::B)
            .await
            .unwrap();

        assert_eq!(service.mistake_count().await.unwrap(), 1);
        let all = service.list_mistakes().await.unwrap();
        assert_eq!(all[0].user_answer, OptionLetter::D);

        service.clear_mistake(&key).await.unwrap();
        assert_eq!(service.mistake_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn review_list_covers_answered_questions_only() {
        let (service, repo, id) = service_with_test();

        let mut progress = TestProgress::new(id.clone(), 3, fixed_now());
        progress.record_answer(0, OptionLetter::A, true, fixed_now());
        progress.record_answer(2, OptionLetter::D, false, fixed_now());
        repo.upsert_progress(&progress).await.unwrap();

        service
            .toggle_saved(&QuestionKey::new(id.clone(), 2), "question 3")
            .await
            .unwrap();

        let items = service.review_list(&id, None).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_correct);
        assert!(!items[0].is_saved);
        assert!(!items[1].is_correct);
        assert!(items[1].is_saved);
        assert_eq!(items[1].correct_answer, OptionLetter::C);
    }

    #[tokio::test]
    async fn review_list_filters_by_category() {
        let (service, repo, id) = service_with_test();

        let mut progress = TestProgress::new(id.clone(), 3, fixed_now());
        progress.record_answer(0, OptionLetter::A, true, fixed_now());
        progress.record_answer(1, OptionLetter::B, true, fixed_now());
        progress.record_answer(2, OptionLetter::C, true, fixed_now());
        repo.upsert_progress(&progress).await.unwrap();

        let items = service.review_list(&id, Some("traffic")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.category_id == "traffic"));
    }

    #[tokio::test]
    async fn review_list_is_empty_for_unstarted_test() {
        let (service, _repo, id) = service_with_test();
        let items = service.review_list(&id, None).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn review_list_rejects_unknown_test() {
        let (service, _repo, _id) = service_with_test();
        let err = service
            .review_list(&TestId::new("missing"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::ContentNotFound(_)));
    }
}
