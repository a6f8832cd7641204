// src/handlers/account.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    db,
    error::{AppError, is_unique_violation},
    models::user::{
        ChangePasswordRequest, PurchasePackageRequest, UpdateProfileRequest,
        UpdateSettingsRequest, User, UserDataExport, extend_package,
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::Claims,
    },
};

/// Loads the account behind the token, 404 if it was deleted meanwhile.
pub(crate) async fn current_user(pool: &PgPool, claims: &Claims) -> Result<User, AppError> {
    db::users::find_by_id(pool, claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Get current user's account.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(current_user(&pool, &claims).await?))
}

/// Changes the login email. Omitting the email leaves it unchanged.
pub async fn update_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = current_user(&pool, &claims).await?;

    let user = match payload.email {
        Some(email) if email != user.email => db::users::update_email(&pool, user.id, &email)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("Email '{}' is already registered", email))
                } else {
                    AppError::from(e)
                }
            })?,
        _ => user,
    };

    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": user
    })))
}

pub async fn change_password(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = current_user(&pool, &claims).await?;

    let stored_hash = user.password.as_deref().ok_or_else(|| {
        AppError::BadRequest("Google accounts have no password to change".to_string())
    })?;

    if !verify_password(&payload.current_password, stored_hash)? {
        return Err(AppError::BadRequest("Invalid current password".to_string()));
    }

    let hashed = hash_password(&payload.new_password)?;
    db::users::update_password(&pool, user.id, &hashed).await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

/// Toggles mastery-aware exam composition.
pub async fn update_settings(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = db::users::update_settings(&pool, claims.user_id()?, payload.use_optimized_questions)
        .await?;

    Ok(Json(json!({
        "message": "Settings updated",
        "user": user
    })))
}

/// Deletes the account together with its exam history.
pub async fn delete_account(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    if db::users::delete(&pool, user_id).await? == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!("Deleted account {}", user_id);
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

pub async fn export_data(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = current_user(&pool, &claims).await?;
    let test_results = db::results::export_for_user(&pool, user.id).await?;

    Ok(Json(UserDataExport {
        email: user.email,
        package_expiration: user.package_expiration,
        test_results,
    }))
}

/// Buys `days` of access, extending a still-active package.
pub async fn purchase_package(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PurchasePackageRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user = current_user(&pool, &claims).await?;

    let expiration = extend_package(user.package_expiration, payload.days, Utc::now());
    db::users::set_package_expiration(&pool, user.id, expiration).await?;

    tracing::info!(
        "User {} purchased {} days, access until {}",
        user.id,
        payload.days,
        expiration
    );

    Ok(Json(json!({
        "message": "Package purchased successfully",
        "package_expiration": expiration
    })))
}
