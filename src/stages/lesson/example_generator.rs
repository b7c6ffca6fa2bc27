//! Example and case study generation

use super::default_audience;
use super::lesson_body::LessonSection;
use crate::agent::SchemaSpec;
use crate::core::lesson::{Example, LearningObjective};
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an expert educator who creates practical, \
real-world examples. Each example has a short title, a description that connects \
it to the lesson content, and one key takeaway for the learner.";

pub const MAX_EXAMPLES: usize = 5;

fn default_num_examples() -> usize {
    2
}

fn default_example_types() -> Vec<String> {
    vec!["real-world".to_string(), "case study".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleGeneratorInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    pub learning_objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub content_sections: Vec<LessonSection>,
    #[serde(default = "default_example_types")]
    pub example_types: Vec<String>,
    #[serde(default = "default_num_examples")]
    pub num_examples: usize,
}

impl Validate for ExampleGeneratorInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)?;
        validation::len_at_least("learning_objectives", self.learning_objectives.len(), 1)?;
        validation::in_range("num_examples", self.num_examples, 1, MAX_EXAMPLES)
    }
}

/// A pointer to further reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleGeneratorOutput {
    pub examples: Vec<Example>,
    #[serde(default)]
    pub additional_resources: Vec<Resource>,
}

impl Validate for ExampleGeneratorOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::len_between("examples", self.examples.len(), 1, MAX_EXAMPLES)?;
        validation::each("examples", &self.examples)
    }
}

impl OutputSchema for ExampleGeneratorOutput {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "ExampleGeneratorOutput",
        shape: r#"{"examples": [{"title": "string", "description": "string", "key_takeaway": "string"}], "additional_resources": [{"title": "string", "url": "string"}]}"#,
    };
}

/// Illustrates the lesson with worked examples
pub struct ExampleGenerator {
    generator: Generator,
}

impl ExampleGenerator {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &ExampleGeneratorInput) -> String {
        format!(
            "{}\n\nTopic: {}\nTarget Audience: {}\n\nLearning Objectives:\n{}\n\nContent Overview:\n{}\n\n\
             Example Types: {}\nNumber of Examples: {}\n\nPlease provide your response in the specified JSON format.",
            INSTRUCTIONS,
            input.topic,
            input.target_audience,
            prompt::objectives_list(&input.learning_objectives),
            prompt::sections_overview(&input.content_sections),
            input.example_types.join(", "),
            input.num_examples,
        )
    }
}

#[async_trait]
impl Stage for ExampleGenerator {
    type Input = ExampleGeneratorInput;
    type Output = ExampleGeneratorOutput;

    fn name(&self) -> &'static str {
        "generate_examples"
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
    use serde_json::json;
    use std::sync::Arc;

    fn stage() -> ExampleGenerator {
        ExampleGenerator::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"))
    }

    #[tokio::test]
    async fn test_defaults_from_map() {
        let input = json!({
            "topic": "Sorting",
            "learning_objectives": [{"description": "Compare sorts"}],
        });
        let output = stage().process(input.as_object().cloned().unwrap()).await.unwrap();
        assert_eq!(output.examples.len(), 2);
    }

    #[tokio::test]
    async fn test_num_examples_out_of_range() {
        let input = json!({
            "topic": "Sorting",
            "learning_objectives": [{"description": "Compare sorts"}],
            "num_examples": 6,
        });
        let err = stage().process(input.as_object().cloned().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("num_examples"));
    }

    #[test]
    fn test_prompt_overview_is_truncated() {
        let input = ExampleGeneratorInput {
            topic: "Sorting".to_string(),
            target_audience: "beginner".to_string(),
            learning_objectives: vec![],
            content_sections: vec![LessonSection {
                heading: "Bubble sort".to_string(),
                content: "b".repeat(500),
                key_points: vec![],
                learning_objectives_covered: vec![],
            }],
            example_types: default_example_types(),
            num_examples: 2,
        };
        let prompt = stage().prompt(&input);
        assert!(prompt.contains(&format!("- Bubble sort: {}...", "b".repeat(100))));
        assert!(!prompt.contains(&"b".repeat(101)));
    }
}
