//! Lesson review

use crate::agent::SchemaSpec;
use crate::core::course::Lesson;
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an experienced course reviewer. Check the \
lesson below for accuracy, clarity and fit with its module. Approve it or explain \
what should change.";

/// Reviews are scored at a lower temperature than generation
pub const REVIEW_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewInput {
    pub course_topic: String,
    pub module_title: String,
    pub lesson: Lesson,
}

impl Validate for ReviewInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("lesson.title", &self.lesson.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFeedback {
    pub is_approved: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Validate for ReviewFeedback {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl OutputSchema for ReviewFeedback {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "ReviewFeedback",
        shape: r#"{"is_approved": true, "feedback": "string", "suggestions": ["string"]}"#,
    };
}

/// Gives advisory feedback on a generated lesson
pub struct Reviewer {
    generator: Generator,
}

impl Reviewer {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator: generator.with_temperature(REVIEW_TEMPERATURE),
        }
    }

    pub fn prompt(&self, input: &ReviewInput) -> String {
        format!(
            "{}\n\nCourse: {}\nModule: {}\nLesson: {}\nSummary: {}\nObjectives:\n{}\nKey Points:\n{}\n\nPlease provide your response in the specified JSON format.",
            INSTRUCTIONS,
            input.course_topic,
            input.module_title,
            input.lesson.title,
            input.lesson.summary,
            prompt::bullet_list(&input.lesson.objectives, "None"),
            prompt::bullet_list(&input.lesson.key_points, "None"),
        )
    }
}

#[async_trait]
impl Stage for Reviewer {
    type Input = ReviewInput;
    type Output = ReviewFeedback;

    fn name(&self) -> &'static str {
        "review_content"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        let prompt = self.prompt(&input);
        self.generator.generate(self.name(), &prompt, &input).await
    }
}
