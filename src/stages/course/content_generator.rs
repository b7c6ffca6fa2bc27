//! Lesson content generation for courses

use crate::agent::SchemaSpec;
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an expert course author. Write the content \
outline of one lesson: a summary, the lesson objectives and its key points.";

/// Identifies the lesson to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonBrief {
    pub course_topic: String,
    pub module_title: String,
    pub lesson_title: String,
}

impl Validate for LessonBrief {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("course_topic", &self.course_topic)?;
        validation::non_empty("module_title", &self.module_title)?;
        validation::non_empty("lesson_title", &self.lesson_title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDraft {
    #[serde(default)]
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl Validate for LessonDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("summary", &self.summary)
    }
}

impl OutputSchema for LessonDraft {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "LessonDraft",
        shape: r#"{"title": "string", "summary": "string", "objectives": ["string"], "key_points": ["string"]}"#,
    };
}

/// Writes one lesson of a planned course
pub struct ContentGenerator {
    generator: Generator,
}

impl ContentGenerator {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &LessonBrief) -> String {
        format!(
            "{}\n\nCourse: {}\nModule: {}\nLesson: {}\n\nPlease provide your response in the specified JSON format.",
            INSTRUCTIONS, input.course_topic, input.module_title, input.lesson_title,
        )
    }
}

#[async_trait]
impl Stage for ContentGenerator {
    type Input = LessonBrief;
    type Output = LessonDraft;

    fn name(&self) -> &'static str {
        "generate_content"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        let prompt = self.prompt(&input);
        self.generator.generate(self.name(), &prompt, &input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::StubClient;
    use std::sync::Arc;

    fn brief() -> LessonBrief {
        LessonBrief {
            course_topic: "Rust".to_string(),
            module_title: "Ownership".to_string(),
            lesson_title: "Lesson 2".to_string(),
        }
    }

    #[test]
    fn test_prompt_labels() {
        let stage = ContentGenerator::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"));
        let prompt = stage.prompt(&brief());
        assert!(prompt.contains("Course: Rust\nModule: Ownership\nLesson: Lesson 2\n"));
    }

    #[tokio::test]
    async fn test_generates_draft() {
        let stage = ContentGenerator::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"));
        let draft = stage.run(brief()).await.unwrap();
        assert_eq!(draft.title, "Lesson 2");
        assert_eq!(draft.key_points.len(), 3);
    }
}
