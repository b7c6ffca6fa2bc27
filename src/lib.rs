//! coursegen - course and lesson generation driven by multi-stage LLM pipelines

pub mod agent;
pub mod api;
pub mod cli;
pub mod core;
pub mod execution;
pub mod stages;
pub mod usecases;

// Re-export commonly used types
pub use agent::{build_client, AgentClientConfig, AgentError, LanguageModel, StubClient};
pub use core::config::Settings;
pub use core::course::Course;
pub use core::lesson::{Difficulty, LessonContent};
pub use execution::{CourseWorkflow, LessonRequest, LessonWorkflow, WorkflowError, WorkflowEvent};
