use exam_core::model::{QuestionKey, SavedQuestion};

use super::{
    SqliteRepository,
    mapping::{index_to_i64, map_saved_row, u32_from_i64},
};
use crate::repository::{SavedQuestionRepository, StorageError};

#[async_trait::async_trait]
impl SavedQuestionRepository for SqliteRepository {
    async fn is_saved(&self, key: &QuestionKey) -> Result<bool, StorageError> {
        let row = sqlx::query(
            "SELECT 1 FROM saved_questions WHERE test_id = ?1 AND question_index = ?2",
        )
        .bind(key.test_id.as_str())
        .bind(index_to_i64(key.question_index))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(row.is_some())
    }

    async fn save_question(&self, question: &SavedQuestion) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO saved_questions (test_id, question_index, question_text, saved_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(test_id, question_index) DO NOTHING
            ",
        )
        .bind(question.key.test_id.as_str())
        .bind(index_to_i64(question.key.question_index))
        .bind(question.question_text.as_str())
        .bind(question.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn delete_saved(&self, key: &QuestionKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM saved_questions WHERE test_id = ?1 AND question_index = ?2")
            .bind(key.test_id.as_str())
            .bind(index_to_i64(key.question_index))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list_saved(&self) -> Result<Vec<SavedQuestion>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT test_id, question_index, question_text, saved_at
            FROM saved_questions
            ORDER BY saved_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_saved_row(&row)?);
        }
        Ok(out)
    }

    async fn saved_count(&self) -> Result<u64, StorageError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM saved_questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(u64::from(u32_from_i64("saved count", row.0)?))
    }

    async fn clear_saved(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM saved_questions")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
