//! Final lesson assembly

use super::default_audience;
use crate::core::lesson::{Difficulty, Example, LearningObjective, LessonContent, QuizQuestion, SectionMap};
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Used when the metadata carries no duration
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonAssemblerInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    pub learning_objectives: Vec<Map<String, Value>>,
    #[serde(default)]
    pub content_sections: Vec<SectionMap>,
    #[serde(default)]
    pub examples: Vec<Map<String, Value>>,
    #[serde(default)]
    pub quiz_questions: Vec<Map<String, Value>>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Validate for LessonAssemblerInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonAssemblerOutput {
    pub lesson: LessonContent,
    pub metadata: Map<String, Value>,
}

/// Combines the outputs of the earlier stages into a `LessonContent`
///
/// Makes no model call. The same input always yields the same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LessonAssembler;

impl LessonAssembler {
    pub fn new() -> Self {
        Self
    }

    fn assemble(&self, input: &LessonAssemblerInput) -> Result<LessonAssemblerOutput, ValidationError> {
        let difficulty: Difficulty = input.target_audience.parse()?;

        let objectives = input
            .learning_objectives
            .iter()
            .map(|obj| LearningObjective {
                description: str_field(obj, "description"),
                key_concept: str_field(obj, "key_concept"),
            })
            .collect::<Vec<_>>();

        let examples = input
            .examples
            .iter()
            .map(|ex| Example {
                title: str_field(ex, "title"),
                description: str_field(ex, "description"),
                key_takeaway: str_field(ex, "key_takeaway"),
            })
            .collect::<Vec<_>>();

        let questions = input
            .quiz_questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let options = q
                    .get("options")
                    .and_then(Value::as_array)
                    .map(|opts| {
                        opts.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                let correct = q.get("correct_answer").and_then(Value::as_u64).unwrap_or(0);
                QuizQuestion::new(
                    str_field(q, "question"),
                    options,
                    usize::try_from(correct).unwrap_or(usize::MAX),
                    str_field(q, "explanation"),
                )
                .map_err(|e| e.at("quiz_questions", idx))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let summary = input
            .metadata
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let duration = input
            .metadata
            .get("estimated_duration_minutes")
            .and_then(Value::as_u64)
            .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        let lesson = LessonContent::new(
            input.topic.clone(),
            difficulty,
            objectives,
            input.content_sections.clone(),
            examples,
            questions,
            summary,
            duration,
        )?;

        let mut metadata = input.metadata.clone();
        metadata.insert(
            "component_counts".to_string(),
            json!({
                "learning_objectives": lesson.learning_objectives.len(),
                "content_sections": lesson.content_sections.len(),
                "examples": lesson.examples.len(),
                "quiz_questions": lesson.quiz_questions.len(),
            }),
        );

        Ok(LessonAssemblerOutput { lesson, metadata })
    }
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl Stage for LessonAssembler {
    type Input = LessonAssemblerInput;
    type Output = LessonAssemblerOutput;

    fn name(&self) -> &'static str {
        "assemble_lesson"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        self.assemble(&input)
            .map_err(|source| StageError::validation(self.name(), source))
    }
}
