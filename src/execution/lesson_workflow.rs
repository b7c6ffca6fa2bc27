//! Lesson pipeline runner

use crate::agent::LanguageModel;
use crate::core::lesson::{Difficulty, Example, LessonContent, QuizQuestion};
use crate::execution::events::{EventBus, WorkflowEvent};
use crate::execution::state::LessonState;
use crate::execution::WorkflowError;
use crate::stages::lesson::{
    ExampleGenerator, ExampleGeneratorInput, LearningObjectives, LearningObjectivesInput, LessonAssembler,
    LessonAssemblerInput, LessonBody, LessonBodyInput, QuizCreator, QuizCreatorInput, TopicValidator,
    TopicValidatorInput,
};
use crate::stages::{Generator, Stage, StageError};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{error, info};

pub const WORKFLOW_VERSION: &str = "1.0.0";

/// What to generate a lesson about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub context: Option<String>,
    pub learning_objectives: Vec<String>,
    pub custom_instructions: Option<String>,
}

impl LessonRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            difficulty: Difficulty::default(),
            context: None,
            learning_objectives: Vec::new(),
            custom_instructions: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_objectives(mut self, objectives: Vec<String>) -> Self {
        self.learning_objectives = objectives;
        self
    }

    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }
}

/// Runs validate_topic, generate_objectives, generate_content,
/// generate_examples, create_quiz and assemble_lesson in order
pub struct LessonWorkflow {
    generator: Generator,
    events: EventBus,
}

impl LessonWorkflow {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            generator: Generator::new(llm, model),
            events: EventBus::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generator = self.generator.with_temperature(temperature);
        self
    }

    /// Register a progress handler
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(WorkflowEvent) + Send + Sync + 'static,
    {
        self.events.add_handler(handler);
        self
    }

    /// Generate one lesson
    ///
    /// # Errors
    /// Any stage failure aborts the run and is returned once, wrapped in
    /// `WorkflowError::Lesson`.
    pub async fn generate_lesson(&self, request: LessonRequest) -> Result<LessonContent, WorkflowError> {
        let state = self.run(request).await?;
        state
            .assembled
            .map(|assembled| assembled.lesson)
            .ok_or_else(|| WorkflowError::Lesson("lesson assembly produced no output".to_string()))
    }

    /// Run the pipeline and return the final state
    pub async fn run(&self, request: LessonRequest) -> Result<LessonState, WorkflowError> {
        let mut state = LessonState::new(request.topic, request.difficulty);
        state.context = request.context;
        state.requested_objectives = request.learning_objectives;
        state.custom_instructions = request.custom_instructions;

        info!("Starting lesson generation: {} ({})", state.topic, state.execution_id);
        self.events.emit(WorkflowEvent::PipelineStarted {
            execution_id: state.execution_id,
            pipeline: "lesson",
        });

        match self.execute(&mut state).await {
            Ok(()) => {
                state.complete();
                info!(
                    "Lesson generation completed: {} stages ({})",
                    state.completed_stages.len(),
                    state.execution_id
                );
                self.events.emit(WorkflowEvent::PipelineCompleted {
                    execution_id: state.execution_id,
                });
                Ok(state)
            }
            Err(e) => {
                let message = e.to_string();
                error!("Lesson generation failed at '{}': {}", e.stage(), message);
                state.fail(message.clone());
                self.events.emit(WorkflowEvent::PipelineFailed {
                    execution_id: state.execution_id,
                    error: message.clone(),
                });
                Err(WorkflowError::Lesson(message))
            }
        }
    }

    async fn execute(&self, state: &mut LessonState) -> Result<(), StageError> {
        let audience = state.target_audience.to_string();

        let validator = TopicValidator::new(self.generator.clone());
        let validated = self
            .step(
                &validator,
                TopicValidatorInput {
                    topic: state.topic.clone(),
                    target_audience: audience.clone(),
                    context: state.context.clone().unwrap_or_default(),
                },
                state,
            )
            .await?;
        if !validated.is_valid {
            return Err(StageError::Rejected {
                stage: validator.name(),
                reason: validated.validation_message.clone(),
            });
        }
        let scope = validated.suggested_scope.clone();
        let objectives_input = LearningObjectivesInput {
            topic: state.topic.clone(),
            target_audience: audience.clone(),
            scope: scope.clone(),
            prerequisites: validated.prerequisites.clone(),
            requested_objectives: state.requested_objectives.clone(),
        };
        state.validated_topic = Some(validated);

        let objectives_stage = LearningObjectives::new(self.generator.clone());
        let objectives = self.step(&objectives_stage, objectives_input, state).await?;
        let objectives = state.learning_objectives.insert(objectives).objectives.clone();

        let body_stage = LessonBody::new(self.generator.clone());
        let body_input = LessonBodyInput {
            topic: state.topic.clone(),
            target_audience: audience.clone(),
            learning_objectives: objectives.clone(),
            scope,
            key_terms: Vec::new(),
            custom_instructions: state.custom_instructions.clone(),
        };
        let body = self.step(&body_stage, body_input, state).await?;
        let sections = state.content_sections.insert(body).sections.clone();

        let examples_stage = ExampleGenerator::new(self.generator.clone());
        let examples_input: ExampleGeneratorInput = crate::stages::parse_input(
            examples_stage.name(),
            map(json!({
                "topic": state.topic,
                "target_audience": audience,
                "learning_objectives": objectives,
                "content_sections": sections,
            })),
        )?;
        let examples = self.step(&examples_stage, examples_input, state).await?;
        state.examples = Some(examples);

        let quiz_stage = QuizCreator::new(self.generator.clone());
        let quiz_input: QuizCreatorInput = crate::stages::parse_input(
            quiz_stage.name(),
            map(json!({
                "topic": state.topic,
                "target_audience": audience,
                "learning_objectives": objectives,
                "content_sections": sections,
            })),
        )?;
        let quiz = self.step(&quiz_stage, quiz_input, state).await?;
        state.quiz = Some(quiz);

        let assembler = LessonAssembler::new();
        let assembler_input = self.assembler_input(state)?;
        let assembled = self.step(&assembler, assembler_input, state).await?;
        state.metadata = assembled.metadata.clone();
        state.assembled = Some(assembled);

        Ok(())
    }

    fn assembler_input(&self, state: &LessonState) -> Result<LessonAssemblerInput, StageError> {
        const STAGE: &str = "assemble_lesson";

        let body = state.content_sections.as_ref().ok_or_else(|| StageError::Structural {
            stage: STAGE,
            message: "content sections are required for assembly".to_string(),
        })?;

        let examples: Vec<&Example> = state
            .examples
            .iter()
            .flat_map(|e| e.examples.iter())
            .take(LessonContent::MAX_EXAMPLES)
            .collect();
        let questions: Vec<&QuizQuestion> = state
            .quiz
            .iter()
            .flat_map(|q| q.questions.iter())
            .take(LessonContent::MAX_QUIZ_QUESTIONS)
            .collect();
        let objectives = state
            .learning_objectives
            .as_ref()
            .map(|o| o.objectives.as_slice())
            .unwrap_or_default();

        let mut metadata = Map::new();
        metadata.insert("summary".to_string(), json!(body.summary));
        metadata.insert(
            "estimated_duration_minutes".to_string(),
            json!(body.estimated_duration_minutes),
        );
        metadata.insert("generated_at".to_string(), json!(state.started_at.to_rfc3339()));
        metadata.insert("workflow_version".to_string(), json!(WORKFLOW_VERSION));
        metadata.insert("model".to_string(), json!(self.generator.model()));
        metadata.insert("execution_id".to_string(), json!(state.execution_id.to_string()));

        Ok(LessonAssemblerInput {
            topic: state.topic.clone(),
            target_audience: state.target_audience.to_string(),
            learning_objectives: to_maps(STAGE, objectives)?,
            content_sections: body.sections.iter().map(|s| s.to_map()).collect(),
            examples: to_maps(STAGE, &examples)?,
            quiz_questions: to_maps(STAGE, &questions)?,
            metadata,
        })
    }

    async fn step<S: Stage>(&self, stage: &S, input: S::Input, state: &mut LessonState) -> Result<S::Output, StageError> {
        let name = stage.name();
        info!("Running stage: {}", name);
        self.events.emit(WorkflowEvent::StageStarted { stage: name });

        let output = stage.run(input).await?;

        state.complete_stage(name);
        self.events.emit(WorkflowEvent::StageCompleted { stage: name });
        Ok(output)
    }
}

fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn to_maps<T: Serialize>(stage: &'static str, items: &[T]) -> Result<Vec<Map<String, Value>>, StageError> {
    items
        .iter()
        .map(|item| match serde_json::to_value(item) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StageError::Structural {
                stage,
                message: format!("expected an object, got {}", other),
            }),
            Err(e) => Err(StageError::Structural {
                stage,
                message: e.to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::StubClient;
    use std::sync::Mutex;

    fn workflow() -> LessonWorkflow {
        LessonWorkflow::new(Arc::new(StubClient::new()), "gpt-4")
    }

    #[tokio::test]
    async fn test_all_stages_run_in_order() {
        let state = workflow().run(LessonRequest::new("Python loops")).await.unwrap();
        assert_eq!(
            state.completed_stages,
            vec![
                "validate_topic",
                "generate_objectives",
                "generate_content",
                "generate_examples",
                "create_quiz",
                "assemble_lesson"
            ]
        );
        assert_eq!(state.metadata["workflow_version"], WORKFLOW_VERSION);
        assert_eq!(state.metadata["model"], "gpt-4");
        assert_eq!(
            state.metadata["generated_at"],
            json!(state.started_at.to_rfc3339())
        );
    }

    #[tokio::test]
    async fn test_lesson_keeps_topic_and_sections() {
        let request = LessonRequest::new("Python loops").with_difficulty(Difficulty::Advanced);
        let lesson = workflow().generate_lesson(request).await.unwrap();
        assert_eq!(lesson.topic, "Python loops");
        assert_eq!(lesson.difficulty, Difficulty::Advanced);
        assert_eq!(lesson.content_sections.len(), 3);
        assert_eq!(lesson.estimated_duration_minutes, 45);
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let workflow = workflow().on_event(move |e| sink.lock().unwrap().push(e));

        workflow.generate_lesson(LessonRequest::new("Loops")).await.unwrap();

        let events = seen.lock().unwrap();
        assert!(matches!(events.first(), Some(WorkflowEvent::PipelineStarted { pipeline: "lesson", .. })));
        assert!(matches!(events.last(), Some(WorkflowEvent::PipelineCompleted { .. })));
        let started = events
            .iter()
            .filter(|e| matches!(e, WorkflowEvent::StageStarted { .. }))
            .count();
        assert_eq!(started, 6);
    }

    #[tokio::test]
    async fn test_empty_topic_wrapped_once() {
        let err = workflow().generate_lesson(LessonRequest::new("")).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Failed to generate lesson: "));
        assert_eq!(message.matches("Failed to generate lesson").count(), 1);
    }
}
