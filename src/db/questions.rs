// src/db/questions.rs

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder, types::Json};

use crate::models::question::{CreateQuestionRequest, Question, QuestionKind};

const QUESTION_COLUMNS: &str =
    "id, number, content, media, points, category, type, answers, explanation, created_at";

// Category labels are stored comma-joined without spaces, see `normalize_category`.
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::TEXT IS NULL OR $1 = ANY(string_to_array(category, ',')))
      AND ($2::TEXT IS NULL OR type = $2)
"#;

/// Loads questions matching an optional category label and type.
pub async fn fetch_filtered(
    pool: &PgPool,
    category: Option<&str>,
    kind: Option<QuestionKind>,
) -> Result<Vec<Question>, sqlx::Error> {
    let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions {FILTER_CLAUSE} ORDER BY id");
    sqlx::query_as::<_, Question>(&sql)
        .bind(category)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(pool)
        .await
}

pub async fn count(
    pool: &PgPool,
    category: Option<&str>,
    kind: Option<QuestionKind>,
) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM questions {FILTER_CLAUSE}");
    sqlx::query_scalar::<_, i64>(&sql)
        .bind(category)
        .bind(kind.map(|k| k.as_str()))
        .fetch_one(pool)
        .await
}

/// Picks one random question matching the filters.
pub async fn random(
    pool: &PgPool,
    category: Option<&str>,
    kind: Option<QuestionKind>,
) -> Result<Option<Question>, sqlx::Error> {
    let sql =
        format!("SELECT {QUESTION_COLUMNS} FROM questions {FILTER_CLAUSE} ORDER BY RANDOM() LIMIT 1");
    sqlx::query_as::<_, Question>(&sql)
        .bind(category)
        .bind(kind.map(|k| k.as_str()))
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Question>, sqlx::Error> {
    let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
    sqlx::query_as::<_, Question>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Loads the answer key for a submission.
pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Question>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    // Use QueryBuilder for dynamic IN clause
    let mut query_builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE id IN ("
    ));
    let mut separated = query_builder.separated(",");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    query_builder
        .build_query_as::<Question>()
        .fetch_all(pool)
        .await
}

/// Inserts a validated question and returns its id.
/// `content` and `explanation` are expected to be sanitized already.
pub async fn insert<'e, E: PgExecutor<'e>>(
    executor: E,
    req: &CreateQuestionRequest,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions (number, content, media, points, category, type, answers, explanation)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id
        "#,
    )
    .bind(&req.number)
    .bind(&req.content)
    .bind(&req.media)
    .bind(req.points)
    .bind(&req.category)
    .bind(req.kind.as_str())
    .bind(Json(&req.answers))
    .bind(&req.explanation)
    .fetch_one(executor)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Empties the question bank. Answer records stay, detached from their questions.
pub async fn delete_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions")
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
