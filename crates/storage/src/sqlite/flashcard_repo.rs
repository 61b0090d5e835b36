use exam_core::model::FlashcardLearning;

use super::{
    SqliteRepository,
    mapping::{map_flashcard_row, u32_from_i64},
};
use crate::repository::{FlashcardRepository, StorageError};

#[async_trait::async_trait]
impl FlashcardRepository for SqliteRepository {
    async fn upsert_flashcard(&self, card: &FlashcardLearning) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO flashcard_learning (category_id, card_id, description, status, saved_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(category_id, card_id) DO UPDATE SET
                description = excluded.description,
                status = excluded.status,
                saved_at = excluded.saved_at
            ",
        )
        .bind(card.category_id.as_str())
        .bind(card.card_id.as_str())
        .bind(card.description.as_str())
        .bind(card.status.as_str())
        .bind(card.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn list_flashcards(&self) -> Result<Vec<FlashcardLearning>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT category_id, card_id, description, status, saved_at
            FROM flashcard_learning
            ORDER BY saved_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_flashcard_row(&row)?);
        }
        Ok(out)
    }

    async fn learned_count(&self) -> Result<u32, StorageError> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM flashcard_learning WHERE status = 'learned'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?;
        u32_from_i64("learned count", row.0)
    }

    async fn clear_flashcards(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM flashcard_learning")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
