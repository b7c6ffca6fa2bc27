//! Stages of the course pipeline

pub mod content_generator;
pub mod planner;
pub mod reviewer;

pub use content_generator::{ContentGenerator, LessonBrief, LessonDraft};
pub use planner::{CoursePlan, ModulePlan, Planner, PlannerInput};
pub use reviewer::{ReviewFeedback, ReviewInput, Reviewer};
