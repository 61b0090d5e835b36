use std::collections::BTreeMap;

use exam_core::model::{
    FlashcardLearning, LearningStatus, MistakeQuestion, OptionLetter, QuestionKey, SavedQuestion,
    TestId, TestProgress,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn index_to_i64(v: u32) -> i64 {
    i64::from(v)
}

pub(crate) fn letter_from_str(s: &str) -> Result<OptionLetter, StorageError> {
    s.parse::<OptionLetter>().map_err(ser)
}

pub(crate) fn status_from_str(s: &str) -> Result<LearningStatus, StorageError> {
    s.parse::<LearningStatus>().map_err(ser)
}

/// The answered map persists as a JSON object of index -> letter.
pub(crate) fn encode_answers(
    answered: &BTreeMap<u32, OptionLetter>,
) -> Result<String, StorageError> {
    serde_json::to_string(answered).map_err(ser)
}

pub(crate) fn decode_answers(raw: &str) -> Result<BTreeMap<u32, OptionLetter>, StorageError> {
    if raw.is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(raw).map_err(ser)
}

pub(crate) fn map_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<TestProgress, StorageError> {
    let test_id = TestId::new(row.try_get::<String, _>("test_id").map_err(ser)?);
    let total = u32_from_i64(
        "total_question_count",
        row.try_get::<i64, _>("total_question_count").map_err(ser)?,
    )?;
    let answered = decode_answers(&row.try_get::<String, _>("answered_questions").map_err(ser)?)?;
    let correct = u32_from_i64(
        "correct_count",
        row.try_get::<i64, _>("correct_count").map_err(ser)?,
    )?;
    let wrong = u32_from_i64(
        "wrong_count",
        row.try_get::<i64, _>("wrong_count").map_err(ser)?,
    )?;
    let last_index = u32_from_i64(
        "last_question_index",
        row.try_get::<i64, _>("last_question_index").map_err(ser)?,
    )?;
    let is_completed: bool = row.try_get("is_completed").map_err(ser)?;
    let score = row
        .try_get::<Option<i64>, _>("score")
        .map_err(ser)?
        .map(|v| u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid score: {v}"))))
        .transpose()?;

    TestProgress::from_persisted(
        test_id,
        total,
        answered,
        correct,
        wrong,
        last_index,
        is_completed,
        score,
        row.try_get("started_at").map_err(ser)?,
        row.try_get("last_answered_at").map_err(ser)?,
        row.try_get("completed_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_saved_row(row: &sqlx::sqlite::SqliteRow) -> Result<SavedQuestion, StorageError> {
    let key = QuestionKey::new(
        TestId::new(row.try_get::<String, _>("test_id").map_err(ser)?),
        u32_from_i64(
            "question_index",
            row.try_get::<i64, _>("question_index").map_err(ser)?,
        )?,
    );
    Ok(SavedQuestion::new(
        key,
        row.try_get::<String, _>("question_text").map_err(ser)?,
        row.try_get("saved_at").map_err(ser)?,
    ))
}

pub(crate) fn map_mistake_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<MistakeQuestion, StorageError> {
    let key = QuestionKey::new(
        TestId::new(row.try_get::<String, _>("test_id").map_err(ser)?),
        u32_from_i64(
            "question_index",
            row.try_get::<i64, _>("question_index").map_err(ser)?,
        )?,
    );
    Ok(MistakeQuestion::new(
        key,
        row.try_get::<String, _>("question_text").map_err(ser)?,
        letter_from_str(&row.try_get::<String, _>("user_answer").map_err(ser)?)?,
        letter_from_str(&row.try_get::<String, _>("correct_answer").map_err(ser)?)?,
        row.try_get("created_at").map_err(ser)?,
    ))
}

pub(crate) fn map_flashcard_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<FlashcardLearning, StorageError> {
    Ok(FlashcardLearning::new(
        row.try_get::<String, _>("category_id").map_err(ser)?,
        row.try_get::<String, _>("card_id").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        status_from_str(&row.try_get::<String, _>("status").map_err(ser)?)?,
        row.try_get("saved_at").map_err(ser)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answered_map_round_trips_through_json() {
        let mut answered = BTreeMap::new();
        answered.insert(0, OptionLetter::A);
        answered.insert(7, OptionLetter::D);

        let encoded = encode_answers(&answered).unwrap();
        let decoded = decode_answers(&encoded).unwrap();
        assert_eq!(decoded, answered);
    }

    #[test]
    fn empty_string_decodes_to_empty_map() {
        assert!(decode_answers("").unwrap().is_empty());
    }
}
