use exam_core::model::{TestId, TestProgress};

use super::{
    SqliteRepository,
    mapping::{encode_answers, index_to_i64, map_progress_row},
};
use crate::repository::{ProgressRepository, StorageError};

const PROGRESS_COLUMNS: &str = r"
    test_id, total_question_count, answered_questions, correct_count,
    wrong_count, last_question_index, is_completed, score,
    started_at, last_answered_at, completed_at
";

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_progress(&self, test_id: &TestId) -> Result<Option<TestProgress>, StorageError> {
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM test_progress WHERE test_id = ?1"
        );
        let row = sqlx::query(&sql)
            .bind(test_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn upsert_progress(&self, progress: &TestProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO test_progress (
                test_id, total_question_count, answered_questions, correct_count,
                wrong_count, last_question_index, is_completed, score,
                started_at, last_answered_at, completed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(test_id) DO UPDATE SET
                -- keep started_at from the original insert; only update mutable fields
                total_question_count = excluded.total_question_count,
                answered_questions = excluded.answered_questions,
                correct_count = excluded.correct_count,
                wrong_count = excluded.wrong_count,
                last_question_index = excluded.last_question_index,
                is_completed = excluded.is_completed,
                score = excluded.score,
                last_answered_at = excluded.last_answered_at,
                completed_at = excluded.completed_at
            ",
        )
        .bind(progress.test_id().as_str())
        .bind(i64::from(progress.total_question_count()))
        .bind(encode_answers(progress.answered())?)
        .bind(i64::from(progress.correct_count()))
        .bind(i64::from(progress.wrong_count()))
        .bind(index_to_i64(progress.last_question_index()))
        .bind(progress.is_completed())
        .bind(progress.score().map(i64::from))
        .bind(progress.started_at())
        .bind(progress.last_answered_at())
        .bind(progress.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete_progress(&self, test_id: &TestId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM test_progress WHERE test_id = ?1")
            .bind(test_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list_progress(&self) -> Result<Vec<TestProgress>, StorageError> {
        let sql = format!(
            "SELECT {PROGRESS_COLUMNS} FROM test_progress ORDER BY last_answered_at DESC"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_progress_row(&row)?);
        }
        Ok(out)
    }

    async fn clear_progress(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM test_progress")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
