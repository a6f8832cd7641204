// src/exam/scoring.rs

use std::collections::HashMap;

use crate::{
    config::PASSING_SCORE,
    models::{exam_result::SubmittedAnswer, question::Question},
};

/// One submitted answer after checking it against the answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnswer {
    pub question_id: i64,
    pub answer: String,
    pub correct: bool,
    pub time_spent: i32,
    /// Points earned (0 when wrong).
    pub points: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreSheet {
    pub answers: Vec<ScoredAnswer>,
    pub score: i32,
    pub correct_count: usize,
}

impl ScoreSheet {
    pub fn passed(&self) -> bool {
        is_passing(self.score)
    }
}

pub fn is_passing(score: i32) -> bool {
    score >= PASSING_SCORE
}

/// Scores `submitted` against the questions in `key`.
///
/// Answers to questions missing from `key` are dropped: they are neither
/// recorded nor scored. A correct answer earns the question's point value.
pub fn score_answers(submitted: &[SubmittedAnswer], key: &HashMap<i64, Question>) -> ScoreSheet {
    let mut sheet = ScoreSheet::default();

    for sub in submitted {
        let Some(question) = key.get(&sub.question_id) else {
            tracing::debug!("Dropping answer to unknown question {}", sub.question_id);
            continue;
        };

        let correct = question.is_correct(&sub.answer);
        let points = if correct { i32::from(question.points) } else { 0 };

        sheet.score += points;
        if correct {
            sheet.correct_count += 1;
        }
        sheet.answers.push(ScoredAnswer {
            question_id: sub.question_id,
            answer: sub.answer.clone(),
            correct,
            time_spent: sub.time_spent.max(0),
            points,
        });
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerOption, QuestionKind};
    use sqlx::types::Json;

    fn question(id: i64, points: i16, correct: &str) -> Question {
        let answers = ["A", "B", "C"]
            .iter()
            .map(|label| AnswerOption {
                option: label.to_string(),
                content: format!("Option {}", label),
                is_correct: *label == correct,
            })
            .collect();
        Question {
            id,
            number: id.to_string(),
            content: "?".into(),
            media: None,
            points,
            category: "B".into(),
            kind: QuestionKind::Specialist,
            answers: Json(answers),
            explanation: None,
            created_at: None,
        }
    }

    fn answer(question_id: i64, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            answer: answer.to_string(),
            time_spent: 5,
        }
    }

    fn key(questions: Vec<Question>) -> HashMap<i64, Question> {
        questions.into_iter().map(|q| (q.id, q)).collect()
    }

    #[test]
    fn score_sums_points_of_correct_answers() {
        let key = key(vec![question(1, 3, "A"), question(2, 2, "B"), question(3, 1, "C")]);
        let sheet = score_answers(&[answer(1, "A"), answer(2, "C"), answer(3, "C")], &key);

        assert_eq!(sheet.score, 4);
        assert_eq!(sheet.correct_count, 2);
        assert_eq!(sheet.answers.len(), 3);
        assert!(!sheet.answers[1].correct);
        assert_eq!(sheet.answers[1].points, 0);
    }

    #[test]
    fn unknown_questions_are_dropped() {
        let key = key(vec![question(1, 3, "A")]);
        let sheet = score_answers(&[answer(1, "A"), answer(99, "A")], &key);

        assert_eq!(sheet.answers.len(), 1);
        assert_eq!(sheet.score, 3);
    }

    #[test]
    fn labels_compare_exactly() {
        let key = key(vec![question(1, 3, "A")]);
        let sheet = score_answers(&[answer(1, "a")], &key);
        assert_eq!(sheet.score, 0);
    }

    #[test]
    fn question_without_correct_option_never_scores() {
        let mut q = question(1, 3, "A");
        q.answers.0.iter_mut().for_each(|a| a.is_correct = false);
        let sheet = score_answers(&[answer(1, "A")], &key(vec![q]));
        assert_eq!(sheet.score, 0);
    }

    #[test]
    fn pass_threshold() {
        assert!(!is_passing(67));
        assert!(is_passing(68));
        assert!(is_passing(74));
    }
}
