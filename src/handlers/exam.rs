// src/handlers/exam.rs

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    config::DEFAULT_CATEGORY,
    db,
    error::AppError,
    exam::{composer::compose_exam, mastery::mastered_questions},
    handlers::account::current_user,
    models::question::{PublicQuestion, normalize_category},
    utils::jwt::{Claims, MaybeClaims},
};

#[derive(Debug, Deserialize)]
pub struct ExamQuery {
    /// Licence category, "B" when omitted.
    pub category: Option<String>,
}

/// Questions to leave out for this caller.
///
/// Guests get the plain exam. Signed-in users with an active package and the
/// optimized setting skip the questions they have mastered in this category.
async fn exclusions(
    pool: &PgPool,
    claims: Option<&Claims>,
    category: &str,
) -> Result<HashSet<i64>, AppError> {
    let Some(claims) = claims else {
        return Ok(HashSet::new());
    };

    let user = current_user(pool, claims).await?;
    if !user.use_optimized_questions || !user.has_active_package(Utc::now()) {
        return Ok(HashSet::new());
    }

    let attempts = db::results::attempts_in_category(pool, user.id, category).await?;
    let mastered = mastered_questions(&attempts);
    tracing::debug!(
        "User {} has mastered {} questions in category {}",
        user.id,
        mastered.len(),
        category
    );
    Ok(mastered)
}

/// Composes a 32-question mock exam.
///
/// Answers are returned without correctness flags. Fails with 422 when the
/// bank cannot fill every stratum, rather than returning a short exam.
pub async fn get_exam_questions(
    State(pool): State<PgPool>,
    MaybeClaims(claims): MaybeClaims,
    Query(query): Query<ExamQuery>,
) -> Result<impl IntoResponse, AppError> {
    let category = query
        .category
        .as_deref()
        .map(normalize_category)
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let excluded = exclusions(&pool, claims.as_ref(), &category).await?;
    let bank = db::questions::fetch_filtered(&pool, Some(&category), None).await?;
    let bank_size = bank.len();

    let exam = compose_exam(bank, &excluded, &mut rand::thread_rng())?;

    tracing::info!(
        "Composed exam for category {} from {} questions ({} excluded)",
        category,
        bank_size,
        excluded.len()
    );

    let questions: Vec<PublicQuestion> = exam.into_iter().map(PublicQuestion::from).collect();
    Ok(Json(questions))
}
