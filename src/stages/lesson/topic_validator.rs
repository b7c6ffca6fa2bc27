//! Topic validation and refinement

use super::default_audience;
use crate::agent::SchemaSpec;
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an expert educational content validator. \
Your task is to validate and refine lesson topics to ensure they are appropriate, \
clear, and well-scoped for the target audience. Check that the topic is specific \
enough to cover in a single lesson, suggest a scope, and list any prerequisites.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicValidatorInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub context: String,
}

impl TopicValidatorInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            target_audience: default_audience(),
            context: String::new(),
        }
    }
}

impl Validate for TopicValidatorInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)?;
        validation::non_empty("target_audience", &self.target_audience)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicValidatorOutput {
    pub original_topic: String,
    pub refined_topic: String,
    pub is_valid: bool,
    #[serde(default)]
    pub validation_message: String,
    #[serde(default)]
    pub suggested_scope: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

impl Validate for TopicValidatorOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.is_valid {
            validation::non_empty("refined_topic", &self.refined_topic)?;
        }
        Ok(())
    }
}

impl OutputSchema for TopicValidatorOutput {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "TopicValidatorOutput",
        shape: r#"{"original_topic": "string", "refined_topic": "string", "is_valid": true, "validation_message": "string", "suggested_scope": "string", "prerequisites": ["string"]}"#,
    };
}

/// Checks that a topic can be taught in one lesson and proposes a scope
pub struct TopicValidator {
    generator: Generator,
}

impl TopicValidator {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &TopicValidatorInput) -> String {
        prompt::with_input_data(INSTRUCTIONS, input)
    }
}

#[async_trait]
impl Stage for TopicValidator {
    type Input = TopicValidatorInput;
    type Output = TopicValidatorOutput;

    fn name(&self) -> &'static str {
        "validate_topic"
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

    fn stage() -> TopicValidator {
        TopicValidator::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"))
    }

    #[test]
    fn test_prompt_embeds_input() {
        let prompt = stage().prompt(&TopicValidatorInput::new("Python loops"));
        assert!(prompt.contains("Python loops"));
        assert!(prompt.ends_with("Please provide your response in the specified JSON format."));
    }

    #[tokio::test]
    async fn test_empty_topic_rejected_before_generation() {
        let err = stage().run(TopicValidatorInput::new("  ")).await.unwrap_err();
        assert!(matches!(err, StageError::Validation { stage: "validate_topic", .. }));
    }

    #[tokio::test]
    async fn test_process_from_map() {
        let input = json!({"topic": "Rust traits"}).as_object().cloned().unwrap();
        let output = stage().process(input).await.unwrap();
        assert!(output.is_valid);
        assert_eq!(output.original_topic, "Rust traits");
    }
}
