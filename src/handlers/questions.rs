// src/handlers/questions.rs

//! Learning mode: browse the bank and draw single questions with their answers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    db,
    error::AppError,
    models::question::{QuestionFilter, QuestionKind, normalize_category},
};

fn parse_filter(filter: &QuestionFilter) -> Result<(Option<String>, Option<QuestionKind>), AppError> {
    let kind = filter.kind().map_err(AppError::BadRequest)?;
    let category = filter
        .category
        .as_deref()
        .map(normalize_category)
        .filter(|c| !c.is_empty());
    Ok((category, kind))
}

/// Lists questions, including correct answers.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let (category, kind) = parse_filter(&filter)?;
    let questions = db::questions::fetch_filtered(&pool, category.as_deref(), kind).await?;
    Ok(Json(questions))
}

pub async fn count_questions(
    State(pool): State<PgPool>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let (category, kind) = parse_filter(&filter)?;
    let count = db::questions::count(&pool, category.as_deref(), kind).await?;
    Ok(Json(json!({ "count": count })))
}

/// Draws one random question for practice.
pub async fn random_question(
    State(pool): State<PgPool>,
    Query(filter): Query<QuestionFilter>,
) -> Result<impl IntoResponse, AppError> {
    let (category, kind) = parse_filter(&filter)?;
    let question = db::questions::random(&pool, category.as_deref(), kind)
        .await?
        .ok_or_else(|| AppError::NotFound("No question matches the filter".to_string()))?;
    Ok(Json(question))
}

pub async fn get_explanation(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let question = db::questions::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(json!({ "explanation": question.explanation })))
}
