//! Learning objective generation

use super::default_audience;
use crate::agent::SchemaSpec;
use crate::core::lesson::{LearningObjective, LessonContent};
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "You are an expert instructional designer. \
Write clear, measurable learning objectives using Bloom's taxonomy action verbs. \
Each objective names one key concept. Write between 3 and 5 objectives that \
progress from foundational understanding to application.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningObjectivesInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    /// Objectives the caller asked for explicitly
    #[serde(default)]
    pub requested_objectives: Vec<String>,
}

impl Validate for LearningObjectivesInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningObjectivesOutput {
    pub objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub alignment_note: String,
}

impl Validate for LearningObjectivesOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::len_between(
            "objectives",
            self.objectives.len(),
            1,
            LessonContent::MAX_OBJECTIVES,
        )?;
        validation::each("objectives", &self.objectives)
    }
}

impl OutputSchema for LearningObjectivesOutput {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "LearningObjectivesOutput",
        shape: r#"{"objectives": [{"description": "string", "key_concept": "string"}], "difficulty": "string", "alignment_note": "string"}"#,
    };
}

/// Produces the lesson's learning objectives
pub struct LearningObjectives {
    generator: Generator,
}

impl LearningObjectives {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &LearningObjectivesInput) -> String {
        let mut prompt = format!(
            "{}\n\nTopic: {}\nTarget Audience: {}\nScope: {}\nPrerequisites:\n{}\n",
            INSTRUCTIONS,
            input.topic,
            input.target_audience,
            input.scope,
            prompt::bullet_list(&input.prerequisites, "None"),
        );
        if !input.requested_objectives.is_empty() {
            prompt.push_str(&format!(
                "\nInclude these objectives requested by the instructor:\n{}\n",
                prompt::bullet_list(&input.requested_objectives, "")
            ));
        }
        prompt.push_str("\nPlease provide your response in the specified JSON format.");
        prompt
    }
}

#[async_trait]
impl Stage for LearningObjectives {
    type Input = LearningObjectivesInput;
    type Output = LearningObjectivesOutput;

    fn name(&self) -> &'static str {
        "generate_objectives"
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

    fn input() -> LearningObjectivesInput {
        LearningObjectivesInput {
            topic: "Recursion".to_string(),
            target_audience: "beginner".to_string(),
            scope: "Base cases and recursive calls".to_string(),
            prerequisites: vec!["Functions".to_string()],
            requested_objectives: vec![],
        }
    }

    fn stage() -> LearningObjectives {
        LearningObjectives::new(Generator::new(Arc::new(StubClient::new()), "gpt-4"))
    }

    #[test]
    fn test_prompt_lists_requested_objectives() {
        let mut input = input();
        let plain = stage().prompt(&input);
        assert!(!plain.contains("requested by the instructor"));

        input.requested_objectives = vec!["Trace a call stack".to_string()];
        let prompt = stage().prompt(&input);
        assert!(prompt.contains("- Trace a call stack"));
        assert!(prompt.contains("- Functions"));
    }

    #[test]
    fn test_too_many_objectives_invalid() {
        let objective = LearningObjective {
            description: "Do a thing".to_string(),
            key_concept: "Thing".to_string(),
        };
        let output = LearningObjectivesOutput {
            objectives: vec![objective; 6],
            difficulty: String::new(),
            alignment_note: String::new(),
        };
        assert_eq!(output.validate().unwrap_err().field, "objectives");
    }

    #[tokio::test]
    async fn test_run_with_stub() {
        let output = stage().run(input()).await.unwrap();
        assert_eq!(output.objectives.len(), 3);
    }
}
