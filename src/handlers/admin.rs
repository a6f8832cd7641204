// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    db,
    error::AppError,
    models::question::{CreateQuestionRequest, ImportQuestionsRequest, normalize_category},
    utils::{html::clean_html, jwt::Claims},
};

/// Sanitizes free text and normalizes category labels before storage.
fn prepare_question(mut req: CreateQuestionRequest) -> CreateQuestionRequest {
    req.content = clean_html(&req.content);
    req.explanation = req.explanation.as_deref().map(clean_html);
    req.category = normalize_category(&req.category);
    for answer in &mut req.answers {
        answer.content = clean_html(&answer.content);
    }
    req
}

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let users = db::users::list(&pool).await.map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(users))
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.user_id()? {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    if db::users::delete(&pool, id).await? == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("Admin deleted user {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Adds one question to the bank.
/// Admin only.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = prepare_question(payload);
    let id = db::questions::insert(&pool, &question).await.map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Loads a question catalogue in one transaction.
/// With `replace`, the existing bank is dropped first. Saved results and their
/// answer records are kept.
/// Admin only.
pub async fn import_questions(
    State(pool): State<PgPool>,
    Json(payload): Json<ImportQuestionsRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut tx = pool.begin().await?;

    let removed = if payload.replace {
        db::questions::delete_all(&mut *tx).await?
    } else {
        0
    };

    let mut imported = 0usize;
    for question in payload.questions {
        let question = prepare_question(question);
        db::questions::insert(&mut *tx, &question).await?;
        imported += 1;
    }

    tx.commit().await?;

    tracing::info!("Imported {} questions, removed {}", imported, removed);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({"imported": imported, "removed": removed})),
    ))
}

/// Deletes a question by ID.
/// Admin only.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if db::questions::delete(&pool, id).await? == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{AnswerOption, QuestionKind};

    #[test]
    fn prepare_question_sanitizes_and_normalizes() {
        let req = CreateQuestionRequest {
            number: "1".into(),
            content: "Stop<script>x()</script>".into(),
            media: None,
            points: 1,
            category: "A, B".into(),
            kind: QuestionKind::Basic,
            answers: vec![
                AnswerOption {
                    option: "Tak".into(),
                    content: "<i>Tak</i>".into(),
                    is_correct: true,
                },
                AnswerOption {
                    option: "Nie".into(),
                    content: "Nie".into(),
                    is_correct: false,
                },
            ],
            explanation: Some("<img src=x onerror=alert(1)>".into()),
        };

        let prepared = prepare_question(req);
        assert_eq!(prepared.content, "Stop");
        assert_eq!(prepared.category, "A,B");
        assert_eq!(prepared.answers[0].content, "<i>Tak</i>");
        assert!(!prepared.explanation.unwrap().contains("onerror"));
    }
}
