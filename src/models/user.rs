// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique login email.
    pub email: String,

    /// Argon2 password hash. `None` for accounts created through Google sign-in.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: Option<String>,

    /// Federated identity marker.
    #[serde(skip)]
    pub google_id: Option<String>,

    /// User role: 'user' or 'admin'.
    pub role: String,

    /// Access to paid features ends at this instant.
    pub package_expiration: Option<DateTime<Utc>>,

    /// Prefer questions the user has not mastered when composing exams.
    pub use_optimized_questions: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_federated(&self) -> bool {
        self.google_id.is_some()
    }

    pub fn has_active_package(&self, now: DateTime<Utc>) -> bool {
        self.package_expiration.is_some_and(|exp| exp > now)
    }
}

/// Computes the expiration after buying `days` more days of access.
/// An active package is extended; an expired or missing one restarts from `now`.
pub fn extend_package(
    current: Option<DateTime<Utc>>,
    days: i64,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let base = match current {
        Some(exp) if exp > now => exp,
        _ => now,
    };
    base + chrono::Duration::days(days)
}

/// DTO for registration and login.
/// Either `password` or `google_id` identifies the account.
#[derive(Debug, Deserialize, Validate)]
pub struct AuthRequest {
    #[validate(email(message = "Invalid email address."), length(max = 254))]
    pub email: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub google_id: Option<String>,
}

/// Response body for a successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email address."), length(max = 254))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    pub current_password: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password length must be between 6 and 128 characters."
    ))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub use_optimized_questions: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PurchasePackageRequest {
    #[validate(range(min = 1, max = 365))]
    pub days: i64,
}

/// Summary row of the account data export.
#[derive(Debug, Serialize, FromRow)]
pub struct ExportedResult {
    pub date: DateTime<Utc>,
    pub score: i32,
    pub passed: bool,
}

#[derive(Debug, Serialize)]
pub struct UserDataExport {
    pub email: String,
    pub package_expiration: Option<DateTime<Utc>>,
    pub test_results: Vec<ExportedResult>,
}
