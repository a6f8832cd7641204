// src/db/results.rs

use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    exam::scoring::ScoreSheet,
    models::{
        exam_result::{AnswerRecord, AttemptSummary, ExamResult},
        user::ExportedResult,
    },
};

/// Stores a scored exam and its answer records in one transaction.
pub async fn save(pool: &PgPool, user_id: i64, sheet: &ScoreSheet) -> Result<ExamResult, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut result = sqlx::query_as::<_, ExamResult>(
        r#"
        INSERT INTO exam_results (user_id, score, passed)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, score, passed, taken_at
        "#,
    )
    .bind(user_id)
    .bind(sheet.score)
    .bind(sheet.passed())
    .fetch_one(&mut *tx)
    .await?;

    for answer in &sheet.answers {
        let record = sqlx::query_as::<_, AnswerRecord>(
            r#"
            INSERT INTO answer_records (result_id, user_id, question_id, answer, correct, points, time_spent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING result_id, question_id, answer, correct, points, time_spent, answered_at
            "#,
        )
        .bind(result.id)
        .bind(user_id)
        .bind(answer.question_id)
        .bind(&answer.answer)
        .bind(answer.correct)
        .bind(answer.points)
        .bind(answer.time_spent)
        .fetch_one(&mut *tx)
        .await?;
        result.answers.push(record);
    }

    tx.commit().await?;
    Ok(result)
}

/// All results of a user, newest first, with their answer records.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ExamResult>, sqlx::Error> {
    let mut results = sqlx::query_as::<_, ExamResult>(
        r#"
        SELECT id, user_id, score, passed, taken_at
        FROM exam_results
        WHERE user_id = $1
        ORDER BY taken_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let records = sqlx::query_as::<_, AnswerRecord>(
        r#"
        SELECT result_id, question_id, answer, correct, points, time_spent, answered_at
        FROM answer_records
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut by_result: HashMap<i64, Vec<AnswerRecord>> = HashMap::new();
    for record in records {
        by_result.entry(record.result_id).or_default().push(record);
    }
    for result in &mut results {
        result.answers = by_result.remove(&result.id).unwrap_or_default();
    }

    Ok(results)
}

/// Answer history of a user restricted to questions of one category.
pub async fn attempts_in_category(
    pool: &PgPool,
    user_id: i64,
    category: &str,
) -> Result<Vec<AttemptSummary>, sqlx::Error> {
    sqlx::query_as::<_, AttemptSummary>(
        r#"
        SELECT r.question_id, r.correct, r.time_spent
        FROM answer_records r
        JOIN questions q ON q.id = r.question_id
        WHERE r.user_id = $1 AND $2 = ANY(string_to_array(q.category, ','))
        "#,
    )
    .bind(user_id)
    .bind(category)
    .fetch_all(pool)
    .await
}

pub async fn export_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ExportedResult>, sqlx::Error> {
    sqlx::query_as::<_, ExportedResult>(
        r#"
        SELECT taken_at AS date, score, passed
        FROM exam_results
        WHERE user_id = $1
        ORDER BY taken_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
