// src/db/users.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::user::User;

const USER_COLUMNS: &str =
    "id, email, password, google_id, role, package_expiration, use_optimized_questions, created_at";

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id DESC");
    sqlx::query_as::<_, User>(&sql).fetch_all(pool).await
}

/// Creates an account. Password accounts pass a hash, federated ones a Google id.
pub async fn create(
    pool: &PgPool,
    email: &str,
    password_hash: Option<&str>,
    google_id: Option<&str>,
    role: &str,
) -> Result<User, sqlx::Error> {
    let sql = format!(
        "INSERT INTO users (email, password, google_id, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(password_hash)
        .bind(google_id)
        .bind(role)
        .fetch_one(pool)
        .await
}

pub async fn update_email(pool: &PgPool, id: i64, email: &str) -> Result<User, sqlx::Error> {
    let sql = format!("UPDATE users SET email = $1 WHERE id = $2 RETURNING {USER_COLUMNS}");
    sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn update_password(pool: &PgPool, id: i64, password_hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_settings(
    pool: &PgPool,
    id: i64,
    use_optimized_questions: bool,
) -> Result<User, sqlx::Error> {
    let sql = format!(
        "UPDATE users SET use_optimized_questions = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(use_optimized_questions)
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn set_package_expiration(
    pool: &PgPool,
    id: i64,
    expiration: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET package_expiration = $1 WHERE id = $2")
        .bind(expiration)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Deletes the account; results and answer records cascade.
pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
