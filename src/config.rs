// src/config.rs

use std::env;

use dotenvy::dotenv;
use thiserror::Error;

/// Number of basic (yes/no) questions in a mock exam.
pub const BASIC_QUESTION_COUNT: usize = 20;

/// Number of specialist (A/B/C) questions in a mock exam.
pub const SPECIALIST_QUESTION_COUNT: usize = 12;

/// Total questions in a composed exam.
pub const EXAM_QUESTION_COUNT: usize = BASIC_QUESTION_COUNT + SPECIALIST_QUESTION_COUNT;

/// Points required to pass a mock exam.
pub const PASSING_SCORE: i32 = 68;

/// Nominal maximum points of a mock exam.
pub const MAX_SCORE: i32 = 74;

/// Category used when the caller does not name one.
pub const DEFAULT_CATEGORY: &str = "B";

/// An answer at or below this many seconds counts as "fast".
pub const FAST_ANSWER_SECONDS: i32 = 3;

/// Correct attempts required before a question counts as mastered.
pub const MASTERY_MIN_CORRECT: usize = 2;

/// Fast correct attempts required before a question counts as mastered.
pub const MASTERY_MIN_FAST_CORRECT: usize = 2;

/// Upper bound on a single package purchase.
pub const MAX_PACKAGE_DAYS: i64 = 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = parsed("JWT_EXPIRATION", 3600)?;
        let server_port = parsed("SERVER_PORT", 5000)?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            server_port,
            cors_origins,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
