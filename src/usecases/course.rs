//! Course generation use case

use crate::agent::LanguageModel;
use crate::core::course::{Course, Module};
use crate::execution::{CourseWorkflow, WorkflowError};
use std::sync::Arc;
use tracing::info;

/// Generate a course and shape it for the response
pub struct GenerateCourseContent {
    llm: Arc<dyn LanguageModel>,
    model: String,
    review: bool,
}

impl GenerateCourseContent {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            review: true,
        }
    }

    pub fn with_review(mut self, enabled: bool) -> Self {
        self.review = enabled;
        self
    }

    pub async fn execute(&self, topic: &str) -> Result<Course, WorkflowError> {
        info!("Generating course on topic: {} with {}", topic, self.model);
        let workflow = CourseWorkflow::new(self.llm.clone(), self.model.clone()).with_review(self.review);
        let course = workflow.generate_course(topic).await?;
        format_course(course)
    }
}

/// Ensure the course has modules and every module a description
pub fn format_course(course: Course) -> Result<Course, WorkflowError> {
    if course.modules.is_empty() {
        return Err(WorkflowError::Course(
            "Course must have at least one module".to_string(),
        ));
    }

    let modules = course
        .modules
        .into_iter()
        .map(|m| Module {
            description: if m.description.trim().is_empty() {
                format!("Module on {}", m.title)
            } else {
                m.description
            },
            ..m
        })
        .collect();

    Ok(Course {
        topic: course.topic,
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(title: &str, description: &str) -> Module {
        Module {
            title: title.to_string(),
            description: description.to_string(),
            lessons: vec![],
        }
    }

    #[test]
    fn test_missing_description_filled() {
        let course = Course {
            topic: "Rust".to_string(),
            modules: vec![module("Basics", ""), module("Traits", "Shared behaviour")],
        };
        let formatted = format_course(course).unwrap();
        assert_eq!(formatted.modules[0].description, "Module on Basics");
        assert_eq!(formatted.modules[1].description, "Shared behaviour");
    }

    #[test]
    fn test_course_without_modules_rejected() {
        let course = Course {
            topic: "Rust".to_string(),
            modules: vec![],
        };
        let err = format_course(course).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to generate course: Course must have at least one module"
        );
    }
}
