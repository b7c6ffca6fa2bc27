//! Lesson generation use case

use crate::agent::LanguageModel;
use crate::api::schemas::{GenerateLessonRequest, GenerateLessonResponse, LessonSectionResponse};
use crate::core::lesson::SectionMap;
use crate::execution::{LessonRequest, LessonWorkflow, WorkflowError, WORKFLOW_VERSION};
use crate::stages::DEFAULT_TEMPERATURE;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Generate a lesson and map it to the response contract
pub struct GenerateLesson {
    llm: Arc<dyn LanguageModel>,
    model: String,
    temperature: f32,
}

impl GenerateLesson {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub async fn execute(&self, request: GenerateLessonRequest) -> Result<GenerateLessonResponse, WorkflowError> {
        info!("Generating lesson on topic: {}", request.topic);

        let mut lesson_request = LessonRequest::new(request.topic.clone())
            .with_difficulty(request.difficulty)
            .with_objectives(request.learning_objectives.clone().unwrap_or_default());
        if let Some(context) = &request.context {
            lesson_request = lesson_request.with_context(context.clone());
        }
        if let Some(instructions) = &request.custom_instructions {
            lesson_request = lesson_request.with_custom_instructions(instructions.clone());
        }

        let workflow = LessonWorkflow::new(self.llm.clone(), self.model.clone()).with_temperature(self.temperature);
        let state = workflow.run(lesson_request).await?;
        let assembled = state
            .assembled
            .ok_or_else(|| WorkflowError::Lesson("lesson assembly produced no output".to_string()))?;

        let lesson = assembled.lesson;
        let mut metadata = assembled.metadata;
        metadata
            .entry("version".to_string())
            .or_insert_with(|| json!(WORKFLOW_VERSION));

        Ok(GenerateLessonResponse {
            topic: lesson.topic,
            difficulty: lesson.difficulty,
            learning_objectives: lesson.learning_objectives,
            sections: lesson.content_sections.iter().map(section_response).collect(),
            examples: if request.include_examples {
                lesson.examples
            } else {
                Vec::new()
            },
            quiz_questions: if request.include_quiz {
                lesson.quiz_questions
            } else {
                Vec::new()
            },
            summary: lesson.summary,
            estimated_duration_minutes: lesson.estimated_duration_minutes,
            metadata,
        })
    }
}

fn section_response(section: &SectionMap) -> LessonSectionResponse {
    let text = |key: &str| {
        section
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    LessonSectionResponse {
        heading: text("heading"),
        content: text("content"),
        key_points: section
            .get("key_points")
            .and_then(Value::as_array)
            .map(|points| {
                points
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}
