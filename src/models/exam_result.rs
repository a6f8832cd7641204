// src/models/exam_result.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'exam_results' table in the database.
/// Stores the outcome of one mock exam.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub user_id: i64,
    pub score: i32,
    pub passed: bool,
    pub taken_at: DateTime<Utc>,

    /// Loaded separately from `answer_records`.
    #[sqlx(skip)]
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

/// Represents the 'answer_records' table.
/// One submitted answer, with correctness and points fixed at submission time.
/// `question_id` becomes `None` once the question is removed from the bank.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub result_id: i64,
    pub question_id: Option<i64>,
    pub answer: String,
    pub correct: bool,
    /// Points earned (0 when wrong).
    pub points: i32,
    /// Seconds spent on the question.
    pub time_spent: i32,
    pub answered_at: DateTime<Utc>,
}

/// Slice of the answer history used to decide mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct AttemptSummary {
    pub question_id: i64,
    pub correct: bool,
    pub time_spent: i32,
}

/// A single answer as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    #[validate(length(min = 1, max = 20))]
    pub answer: String,
    #[serde(default)]
    #[validate(range(min = 0, max = 86400))]
    pub time_spent: i32,
}

/// DTO for saving an exam attempt.
/// The user is taken from the token, never from the body.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveResultRequest {
    #[validate(length(min = 1, max = 100), nested)]
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
pub struct SaveResultResponse {
    pub result: ExamResult,
    pub passed: bool,
    pub max_score: i32,
}

/// Aggregates shown on the statistics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub average_score: f64,
    pub best_score: Option<i32>,
}

impl StatsSummary {
    pub fn from_results(results: &[ExamResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let average_score = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| f64::from(r.score)).sum::<f64>() / total as f64
        };

        Self {
            total,
            passed,
            failed: total - passed,
            average_score,
            best_score: results.iter().map(|r| r.score).max(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub results: Vec<ExamResult>,
    pub summary: StatsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: i32, passed: bool) -> ExamResult {
        ExamResult {
            id: 1,
            user_id: 1,
            score,
            passed,
            taken_at: Utc::now(),
            answers: Vec::new(),
        }
    }

    #[test]
    fn summary_of_no_results() {
        let summary = StatsSummary::from_results(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.best_score, None);
    }

    #[test]
    fn summary_counts_pass_and_fail() {
        let results = [result(70, true), result(60, false), result(50, false)];
        let summary = StatsSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.average_score, 60.0);
        assert_eq!(summary.best_score, Some(70));
    }

    #[test]
    fn time_spent_defaults_to_zero() {
        let answer: SubmittedAnswer =
            serde_json::from_str(r#"{"question_id": 4, "answer": "A"}"#).unwrap();
        assert_eq!(answer.time_spent, 0);
    }

    #[test]
    fn negative_time_rejected() {
        let req = SaveResultRequest {
            answers: vec![SubmittedAnswer {
                question_id: 1,
                answer: "A".into(),
                time_spent: -1,
            }],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn oversized_submission_rejected() {
        let answer = SubmittedAnswer {
            question_id: 1,
            answer: "Tak".into(),
            time_spent: 2,
        };
        let req = SaveResultRequest {
            answers: vec![answer; 101],
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("answers"));
    }

    #[test]
    fn empty_submission_rejected() {
        let req = SaveResultRequest { answers: vec![] };
        assert!(req.validate().is_err());
    }
}
