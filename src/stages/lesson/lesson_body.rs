//! Lesson body generation

use super::default_audience;
use crate::agent::SchemaSpec;
use crate::core::lesson::{LearningObjective, SectionMap};
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const INSTRUCTIONS: &str = "You are an expert educator writing the body of a lesson. \
Organize the material into at least three sections with clear headings. Each \
section explains its content, lists key points and names the learning objectives \
it covers. Estimate the time needed to work through the lesson and define key terms.";

pub const MIN_SECTIONS: usize = 3;
pub const MIN_DURATION_MINUTES: u32 = 10;
pub const MAX_DURATION_MINUTES: u32 = 120;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonBodyInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    pub learning_objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub custom_instructions: Option<String>,
}

impl Validate for LessonBodyInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)?;
        validation::len_at_least("learning_objectives", self.learning_objectives.len(), 1)?;
        validation::each("learning_objectives", &self.learning_objectives)
    }
}

/// One titled section of the lesson body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
    pub heading: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub learning_objectives_covered: Vec<String>,
}

impl LessonSection {
    /// Section as a map of named values
    pub fn to_map(&self) -> SectionMap {
        let mut map = SectionMap::new();
        map.insert("heading".to_string(), Value::String(self.heading.clone()));
        map.insert("content".to_string(), Value::String(self.content.clone()));
        map.insert("key_points".to_string(), json!(self.key_points));
        map.insert(
            "learning_objectives_covered".to_string(),
            json!(self.learning_objectives_covered),
        );
        map
    }
}

impl Validate for LessonSection {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("heading", &self.heading)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonBodyOutput {
    pub sections: Vec<LessonSection>,
    pub estimated_duration_minutes: u32,
    #[serde(default)]
    pub key_terms: BTreeMap<String, String>,
    #[serde(default)]
    pub summary: String,
}

impl Validate for LessonBodyOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::len_at_least("sections", self.sections.len(), MIN_SECTIONS)?;
        validation::each("sections", &self.sections)?;
        validation::in_range(
            "estimated_duration_minutes",
            self.estimated_duration_minutes,
            MIN_DURATION_MINUTES,
            MAX_DURATION_MINUTES,
        )
    }
}

impl OutputSchema for LessonBodyOutput {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "LessonBodyOutput",
        shape: r#"{"sections": [{"heading": "string", "content": "string", "key_points": ["string"], "learning_objectives_covered": ["string"]}], "estimated_duration_minutes": 45, "key_terms": {"term": "definition"}, "summary": "string"}"#,
    };
}

/// Writes the sectioned body of the lesson
pub struct LessonBody {
    generator: Generator,
}

impl LessonBody {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &LessonBodyInput) -> String {
        let mut prompt = format!(
            "{}\n\nTopic: {}\nTarget Audience: {}\nScope: {}\n\nLearning Objectives:\n{}\n\nKey Terms to Define:\n{}\n",
            INSTRUCTIONS,
            input.topic,
            input.target_audience,
            input.scope,
            prompt::objectives_list(&input.learning_objectives),
            prompt::bullet_list(&input.key_terms, "None specified"),
        );
        if let Some(extra) = input.custom_instructions.as_deref().filter(|s| !s.trim().is_empty()) {
            prompt.push_str(&format!("\nAdditional instructions: {}\n", extra));
        }
        prompt.push_str("\nPlease provide your response in the specified JSON format.");
        prompt
    }
}

#[async_trait]
impl Stage for LessonBody {
    type Input = LessonBodyInput;
    type Output = LessonBodyOutput;

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

    fn input() -> LessonBodyInput {
        LessonBodyInput {
            topic: "Closures".to_string(),
            target_audience: "intermediate".to_string(),
            learning_objectives: vec![LearningObjective {
                description: "Capture variables".to_string(),
                key_concept: "Capture".to_string(),
            }],
            scope: String::new(),
            key_terms: vec![],
            custom_instructions: Some("Use Rust for all code".to_string()),
        }
    }

    fn section(heading: &str) -> LessonSection {
        LessonSection {
            heading: heading.to_string(),
            content: "text".to_string(),
            key_points: vec![],
            learning_objectives_covered: vec![],
        }
    }

    #[test]
    fn test_prompt_includes_custom_instructions() {
        let stage = LessonBody::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"));
        let prompt = stage.prompt(&input());
        assert!(prompt.contains("Additional instructions: Use Rust for all code"));
        assert!(prompt.contains("- Capture variables (Key Concept: Capture)"));
    }

    #[test]
    fn test_requires_three_sections() {
        let output = LessonBodyOutput {
            sections: vec![section("A"), section("B")],
            estimated_duration_minutes: 30,
            key_terms: BTreeMap::new(),
            summary: String::new(),
        };
        assert_eq!(output.validate().unwrap_err().field, "sections");
    }

    #[test]
    fn test_duration_bounds() {
        let mut output = LessonBodyOutput {
            sections: vec![section("A"), section("B"), section("C")],
            estimated_duration_minutes: 9,
            key_terms: BTreeMap::new(),
            summary: String::new(),
        };
        assert!(output.validate().is_err());
        output.estimated_duration_minutes = 120;
        assert!(output.validate().is_ok());
    }

    #[test]
    fn test_section_to_map() {
        let map = section("Intro").to_map();
        assert_eq!(map["heading"], "Intro");
        assert_eq!(map["key_points"], json!([]));
    }

    #[tokio::test]
    async fn test_missing_objectives_rejected() {
        let stage = LessonBody::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"));
        let mut input = input();
        input.learning_objectives.clear();
        let err = stage.run(input).await.unwrap_err();
        assert!(matches!(err, StageError::Validation { .. }));
    }
}
