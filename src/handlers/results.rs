// src/handlers/results.rs

use std::collections::{HashMap, HashSet};

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::MAX_SCORE,
    db,
    error::AppError,
    exam::scoring::score_answers,
    handlers::account::current_user,
    models::{
        exam_result::{SaveResultRequest, SaveResultResponse, StatsResponse, StatsSummary},
        question::Question,
    },
    utils::jwt::Claims,
};

/// Scores and stores a finished exam.
///
/// * Requires an active package.
/// * Correctness is decided here against the stored answer key, never trusted from the client.
/// * Answers to unknown questions are dropped.
pub async fn save_result(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = current_user(&pool, &claims).await?;
    if !user.has_active_package(Utc::now()) {
        return Err(AppError::Forbidden(
            "An active package is required to save exam results".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let question_ids: Vec<i64> = payload.answers.iter().map(|a| a.question_id).collect();
    if !question_ids.iter().all(|id| seen.insert(*id)) {
        return Err(AppError::BadRequest(
            "Each question may be answered only once".to_string(),
        ));
    }

    let key: HashMap<i64, Question> = db::questions::find_by_ids(&pool, &question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let sheet = score_answers(&payload.answers, &key);
    if sheet.answers.is_empty() {
        return Err(AppError::BadRequest(
            "None of the answered questions exist".to_string(),
        ));
    }

    let result = db::results::save(&pool, user.id, &sheet).await.map_err(|e| {
        tracing::error!("Failed to save exam result: {:?}", e);
        AppError::from(e)
    })?;

    tracing::info!(
        "User {} scored {}/{} ({} correct)",
        user.id,
        result.score,
        MAX_SCORE,
        sheet.correct_count
    );

    Ok((
        StatusCode::CREATED,
        Json(SaveResultResponse {
            passed: result.passed,
            result,
            max_score: MAX_SCORE,
        }),
    ))
}

/// Exam history of the current user, newest first, with pass/fail totals.
pub async fn get_stats(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let results = db::results::list_for_user(&pool, claims.user_id()?).await?;
    let summary = StatsSummary::from_results(&results);

    Ok(Json(StatsResponse { results, summary }))
}
