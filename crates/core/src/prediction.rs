//! Pass-probability estimation over accumulated test progress.
//!
//! This is a calibrated heuristic, not a statistical model. The weight
//! tables, thresholds, and bonus rules are fixed; changing them changes the
//! numbers users have learned to read.

use crate::model::TestProgress;

/// Fixed number of flashcard categories the learned count is measured
/// against.
pub const FLASHCARD_CATEGORY_COUNT: u32 = 8;

/// Pass bar for a completed practice test.
pub const PASS_THRESHOLD: f64 = 0.70;

/// How trustworthy a prediction is, based on the amount of data behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PredictionConfidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Ephemeral estimate of the user's chance to pass the real exam.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub pass_percentage: u8,
    pub confidence: PredictionConfidence,
    pub total_answered: u32,
    pub total_correct: u32,
    pub total_wrong: u32,
    pub completed_tests: u32,
    pub passed_tests: u32,
    pub overall_accuracy: f64,
    pub recent_accuracy: f64,
}

impl PredictionResult {
    fn no_data() -> Self {
        Self {
            pass_percentage: 0,
            confidence: PredictionConfidence::Low,
            total_answered: 0,
            total_correct: 0,
            total_wrong: 0,
            completed_tests: 0,
            passed_tests: 0,
            overall_accuracy: 0.0,
            recent_accuracy: 0.0,
        }
    }
}

/// Compute the pass-probability estimate from all progress records and the
/// learned flashcard count.
///
/// Ordering of the input does not matter; recency is derived from each
/// record's `last_answered_at`.
#[must_use]
pub fn calculate(progress: &[TestProgress], learned_flashcard_count: u32) -> PredictionResult {
    let total_answered: u32 = progress.iter().map(TestProgress::answered_count).sum();
    let total_correct: u32 = progress.iter().map(TestProgress::correct_count).sum();
    let total_wrong: u32 = progress.iter().map(TestProgress::wrong_count).sum();

    if total_answered == 0 {
        return PredictionResult::no_data();
    }

    let overall_accuracy = f64::from(total_correct) / f64::from(total_answered) * 100.0;

    // Recent performance over the 5 most recently touched tests.
    let mut by_recency: Vec<&TestProgress> = progress.iter().collect();
    by_recency.sort_by(|a, b| b.last_answered_at().cmp(&a.last_answered_at()));
    let recent = &by_recency[..by_recency.len().min(5)];
    let recent_answered: u32 = recent.iter().map(|p| p.answered_count()).sum();
    let recent_correct: u32 = recent.iter().map(|p| p.correct_count()).sum();
    let recent_accuracy = if recent_answered > 0 {
        f64::from(recent_correct) / f64::from(recent_answered) * 100.0
    } else {
        overall_accuracy
    };

    // Mock-exam performance: share of completed tests that passed.
    let completed_tests =
        u32::try_from(progress.iter().filter(|p| p.is_completed()).count()).unwrap_or(u32::MAX);
    let passed_tests =
        u32::try_from(progress.iter().filter(|p| p.is_passed()).count()).unwrap_or(u32::MAX);
    let exam_score = if completed_tests > 0 {
        f64::from(passed_tests) / f64::from(completed_tests) * 100.0
    } else {
        recent_accuracy * 0.9
    };

    let flashcard_progress =
        f64::from(learned_flashcard_count) / f64::from(FLASHCARD_CATEGORY_COUNT) * 100.0;

    // With little data the flashcard and exam components carry more weight;
    // once enough questions are answered, raw accuracy dominates.
    let limited_data = total_answered < 50;
    let (question_weight, recent_weight, exam_weight, flashcard_weight) = if limited_data {
        (0.40, 0.20, 0.20, 0.20)
    } else {
        (0.50, 0.25, 0.20, 0.05)
    };

    let mut weighted = overall_accuracy * question_weight
        + recent_accuracy * recent_weight
        + exam_score * exam_weight
        + flashcard_progress * flashcard_weight;

    // Improvement bonus when recent performance outpaces the overall trend.
    if recent_accuracy > overall_accuracy {
        let improvement = recent_accuracy - overall_accuracy;
        if improvement > 10.0 {
            weighted += 3.0;
        } else if improvement > 5.0 {
            weighted += 1.0;
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pass_percentage = weighted.round().clamp(0.0, 100.0) as u8;

    PredictionResult {
        pass_percentage,
        confidence: confidence_for(total_answered, completed_tests),
        total_answered,
        total_correct,
        total_wrong,
        completed_tests,
        passed_tests,
        overall_accuracy,
        recent_accuracy,
    }
}

fn confidence_for(total_answered: u32, completed_tests: u32) -> PredictionConfidence {
    if total_answered >= 300 && completed_tests >= 5 {
        PredictionConfidence::VeryHigh
    } else if total_answered >= 150 && completed_tests >= 3 {
        PredictionConfidence::High
    } else if total_answered >= 50 {
        PredictionConfidence::Medium
    } else {
        PredictionConfidence::Low
    }
}
