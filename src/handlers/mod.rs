// src/handlers/mod.rs

pub mod account;
pub mod admin;
pub mod auth;
pub mod exam;
pub mod questions;
pub mod results;
