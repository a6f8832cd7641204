// src/exam/mod.rs

pub mod composer;
pub mod mastery;
pub mod scoring;
