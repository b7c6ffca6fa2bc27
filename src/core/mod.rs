//! Core domain models
//!
//! Lesson and course aggregates, their validation rules and the service
//! settings.

pub mod config;
pub mod course;
pub mod lesson;
pub mod validation;
