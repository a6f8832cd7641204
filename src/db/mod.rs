// src/db/mod.rs

//! Storage functions over the shared `PgPool`.

pub mod questions;
pub mod results;
pub mod users;
