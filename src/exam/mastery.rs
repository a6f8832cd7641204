// src/exam/mastery.rs

//! Which questions a user has already learned.
//!
//! A question is mastered once the user has answered it correctly at least
//! twice and at least twice quickly. This is a frequency threshold over the
//! whole history, not a spaced-repetition schedule.

use std::collections::{HashMap, HashSet};

use crate::{
    config::{FAST_ANSWER_SECONDS, MASTERY_MIN_CORRECT, MASTERY_MIN_FAST_CORRECT},
    models::exam_result::AttemptSummary,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub fast_correct: usize,
}

impl Tally {
    pub fn record(&mut self, attempt: &AttemptSummary) {
        if attempt.correct {
            self.correct += 1;
            if attempt.time_spent <= FAST_ANSWER_SECONDS {
                self.fast_correct += 1;
            }
        }
    }

    pub fn is_mastered(&self) -> bool {
        self.correct >= MASTERY_MIN_CORRECT && self.fast_correct >= MASTERY_MIN_FAST_CORRECT
    }
}

/// Per-question tallies of a user's answer history.
pub fn tally_attempts(attempts: &[AttemptSummary]) -> HashMap<i64, Tally> {
    let mut tallies: HashMap<i64, Tally> = HashMap::new();
    for attempt in attempts {
        tallies.entry(attempt.question_id).or_default().record(attempt);
    }
    tallies
}

/// Ids of the questions to leave out of an optimized exam.
pub fn mastered_questions(attempts: &[AttemptSummary]) -> HashSet<i64> {
    tally_attempts(attempts)
        .into_iter()
        .filter(|(_, tally)| tally.is_mastered())
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(question_id: i64, correct: bool, time_spent: i32) -> AttemptSummary {
        AttemptSummary {
            question_id,
            correct,
            time_spent,
        }
    }

    #[test]
    fn three_correct_two_fast_is_mastered() {
        let history = [attempt(1, true, 2), attempt(1, true, 3), attempt(1, true, 10)];
        assert_eq!(mastered_questions(&history), HashSet::from([1]));
    }

    #[test]
    fn slow_correct_answers_are_not_enough() {
        let history = [attempt(1, true, 4), attempt(1, true, 5), attempt(1, true, 1)];
        assert!(mastered_questions(&history).is_empty());
    }

    #[test]
    fn fast_wrong_answers_do_not_count() {
        let history = [
            attempt(1, false, 1),
            attempt(1, false, 1),
            attempt(1, true, 1),
        ];
        let tallies = tally_attempts(&history);
        assert_eq!(
            tallies[&1],
            Tally {
                correct: 1,
                fast_correct: 1
            }
        );
        assert!(!tallies[&1].is_mastered());
    }

    #[test]
    fn threshold_is_inclusive_at_three_seconds() {
        let history = [attempt(5, true, 3), attempt(5, true, 3)];
        assert!(mastered_questions(&history).contains(&5));
    }

    #[test]
    fn questions_are_tallied_separately() {
        let history = [
            attempt(1, true, 1),
            attempt(2, true, 1),
            attempt(1, true, 2),
            attempt(2, false, 1),
        ];
        assert_eq!(mastered_questions(&history), HashSet::from([1]));
    }

    #[test]
    fn empty_history_masters_nothing() {
        assert!(mastered_questions(&[]).is_empty());
    }
}
