// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    db,
    error::{AppError, is_unique_violation},
    models::user::{AuthRequest, AuthResponse, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

fn issue_token(user: User, config: &Config) -> Result<AuthResponse, AppError> {
    let token = sign_jwt(user.id, &user.role, &config.jwt_secret, config.jwt_expiration)?;
    Ok(AuthResponse { user, token })
}

async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: Option<&str>,
    google_id: Option<&str>,
) -> Result<User, AppError> {
    db::users::create(pool, email, password_hash, google_id, "user")
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Email '{}' is already registered", email))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::from(e)
            }
        })
}

/// Registers a new user.
///
/// Email accounts hash the password with Argon2. Google accounts store no
/// password; registering an existing Google account simply signs it in.
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<AuthRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if let Some(existing) = db::users::find_by_email(&pool, &payload.email).await? {
        if payload.google_id.is_some() {
            if !existing.is_federated() {
                return Err(AppError::BadRequest(
                    "Account already exists. Please log in with your email and password."
                        .to_string(),
                ));
            }
            return Ok((StatusCode::OK, Json(issue_token(existing, &config)?)));
        }
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let user = match (&payload.google_id, &payload.password) {
        (Some(google_id), _) => create_account(&pool, &payload.email, None, Some(google_id.as_str())).await?,
        (None, Some(password)) => {
            let hashed_password = hash_password(password)?;
            create_account(&pool, &payload.email, Some(&hashed_password), None).await?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Password is required for standard registration".to_string(),
            ));
        }
    };

    tracing::info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(issue_token(user, &config)?)))
}

/// Authenticates a user and returns a JWT token.
///
/// Google sign-in for an unknown email creates the account on the fly.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<AuthRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let Some(user) = db::users::find_by_email(&pool, &payload.email).await? else {
        return match &payload.google_id {
            Some(google_id) => {
                let user = create_account(&pool, &payload.email, None, Some(google_id.as_str())).await?;
                tracing::info!("Created Google account {} on first login", user.id);
                Ok((StatusCode::CREATED, Json(issue_token(user, &config)?)))
            }
            None => Err(AppError::NotFound("User not found".to_string())),
        };
    };

    match (&payload.google_id, &user.google_id) {
        (Some(_), None) => {
            return Err(AppError::BadRequest(
                "Account was created with email and password. Please log in using your credentials."
                    .to_string(),
            ));
        }
        (Some(given), Some(stored)) => {
            if given != stored {
                return Err(AppError::BadRequest("Invalid Google ID".to_string()));
            }
        }
        (None, Some(_)) => {
            return Err(AppError::BadRequest(
                "Account requires Google Login".to_string(),
            ));
        }
        (None, None) => {
            let password = payload
                .password
                .as_deref()
                .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;
            let stored_hash = user
                .password
                .as_deref()
                .ok_or_else(|| AppError::InternalServerError(format!("User {} has no password", user.id)))?;

            if !verify_password(password, stored_hash)? {
                return Err(AppError::AuthError("Invalid credentials".to_string()));
            }
        }
    }

    Ok((StatusCode::OK, Json(issue_token(user, &config)?)))
}
