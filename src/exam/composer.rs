// src/exam/composer.rs

//! Mock exam composition.
//!
//! An exam is a stratified sample of the question bank: a fixed number of
//! questions per (type, point value) pair, shuffled together.

use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;

use crate::{
    config::EXAM_QUESTION_COUNT,
    models::question::{Question, QuestionKind},
};

/// How many questions of one type and point value an exam takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stratum {
    pub kind: QuestionKind,
    pub points: i16,
    pub count: usize,
}

const fn stratum(kind: QuestionKind, points: i16, count: usize) -> Stratum {
    Stratum {
        kind,
        points,
        count,
    }
}

/// Basic: 10/6/4 at 3/2/1 points. Specialist: 6/4/2 at 3/2/1 points.
pub const EXAM_BLUEPRINT: [Stratum; 6] = [
    stratum(QuestionKind::Basic, 3, 10),
    stratum(QuestionKind::Basic, 2, 6),
    stratum(QuestionKind::Basic, 1, 4),
    stratum(QuestionKind::Specialist, 3, 6),
    stratum(QuestionKind::Specialist, 2, 4),
    stratum(QuestionKind::Specialist, 1, 2),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error(
        "Not enough {kind} questions worth {points} points: {required} required, {available} available"
    )]
    PoolInsufficient {
        kind: QuestionKind,
        points: i16,
        required: usize,
        available: usize,
    },
}

/// Composes a 32-question exam from `pool`.
///
/// Questions whose id is in `excluded` are never drawn. Strata are checked in
/// blueprint order and the first one that cannot be filled fails the whole
/// composition; a short exam is never returned.
pub fn compose_exam<R: Rng + ?Sized>(
    pool: Vec<Question>,
    excluded: &HashSet<i64>,
    rng: &mut R,
) -> Result<Vec<Question>, ComposeError> {
    let mut strata: HashMap<(QuestionKind, i16), Vec<Question>> = HashMap::new();
    for question in pool {
        if excluded.contains(&question.id) {
            continue;
        }
        strata
            .entry((question.kind, question.points))
            .or_default()
            .push(question);
    }

    let mut exam = Vec::with_capacity(EXAM_QUESTION_COUNT);
    for s in &EXAM_BLUEPRINT {
        let mut bucket = strata.remove(&(s.kind, s.points)).unwrap_or_default();
        if bucket.len() < s.count {
            return Err(ComposeError::PoolInsufficient {
                kind: s.kind,
                points: s.points,
                required: s.count,
                available: bucket.len(),
            });
        }
        bucket.shuffle(rng);
        bucket.truncate(s.count);
        exam.extend(bucket);
    }

    exam.shuffle(rng);
    Ok(exam)
}
