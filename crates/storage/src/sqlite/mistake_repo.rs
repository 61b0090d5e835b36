use exam_core::model::{MistakeQuestion, QuestionKey};

use super::{
    SqliteRepository,
    mapping::{index_to_i64, map_mistake_row, u32_from_i64},
};
use crate::repository::{MistakeRepository, StorageError};

#[async_trait::async_trait]
impl MistakeRepository for SqliteRepository {
    async fn upsert_mistake(&self, mistake: &MistakeQuestion) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO mistake_questions (
                test_id, question_index, question_text, user_answer, correct_answer, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(test_id, question_index) DO UPDATE SET
                user_answer = excluded.user_answer,
                created_at = excluded.created_at
            ",
        )
        .bind(mistake.key.test_id.as_str())
        .bind(index_to_i64(mistake.key.question_index))
        .bind(mistake.question_text.as_str())
        .bind(mistake.user_answer.as_str())
        .bind(mistake.correct_answer.as_str())
        .bind(mistake.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn delete_mistake(&self, key: &QuestionKey) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM mistake_questions WHERE test_id = ?1 AND question_index = ?2")
            .bind(key.test_id.as_str())
            .bind(index_to_i64(key.question_index))
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list_mistakes(&self) -> Result<Vec<MistakeQuestion>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT test_id, question_index, question_text, user_answer, correct_answer, created_at
            FROM mistake_questions
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_mistake_row(&row)?);
        }
        Ok(out)
    }

    async fn mistake_count(&self) -> Result<u64, StorageError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM mistake_questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(u64::from(u32_from_i64("mistake count", row.0)?))
    }

    async fn clear_mistakes(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM mistake_questions")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
