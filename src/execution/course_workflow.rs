//! Course pipeline runner

use crate::agent::LanguageModel;
use crate::core::course::{Course, Lesson};
use crate::execution::course_machine::{transition, CourseEvent};
use crate::execution::events::{EventBus, WorkflowEvent};
use crate::execution::state::{CourseState, CourseStatus, Cursor};
use crate::execution::WorkflowError;
use crate::stages::course::{ContentGenerator, LessonBrief, Planner, PlannerInput, ReviewInput, Reviewer};
use crate::stages::{Generator, Stage, StageError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Plans a course, then writes and reviews each lesson in order
pub struct CourseWorkflow {
    planner: Planner,
    writer: ContentGenerator,
    reviewer: Reviewer,
    review: bool,
    events: EventBus,
}

impl CourseWorkflow {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        let generator = Generator::new(llm, model);
        Self {
            planner: Planner::new(generator.clone()),
            writer: ContentGenerator::new(generator.clone()),
            reviewer: Reviewer::new(generator),
            review: true,
            events: EventBus::new(),
        }
    }

    /// Enable or disable the advisory review after each lesson
    pub fn with_review(mut self, enabled: bool) -> Self {
        self.review = enabled;
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

    /// Generate a course
    ///
    /// # Errors
    /// Returns `WorkflowError::Course` if any stage fails or the machine
    /// reaches an invalid state.
    pub async fn generate_course(&self, topic: &str) -> Result<Course, WorkflowError> {
        let state = self.run(topic).await?;
        state
            .course
            .ok_or_else(|| WorkflowError::Course("no course structure was produced".to_string()))
    }

    /// Drive the machine to completion and return the final state
    pub async fn run(&self, topic: &str) -> Result<CourseState, WorkflowError> {
        let mut state = CourseState::new(topic).with_review(self.review);
        let execution_id = state.execution_id;

        info!("Starting course generation: {} ({})", topic, execution_id);
        self.events.emit(WorkflowEvent::PipelineStarted {
            execution_id,
            pipeline: "course",
        });

        loop {
            let event = match &state.status {
                CourseStatus::Done => break,
                CourseStatus::Failed { reason } => {
                    let reason = reason.clone();
                    return Err(self.fail(&state, reason));
                }
                CourseStatus::Planning => {
                    let plan = self
                        .step(&self.planner, PlannerInput::new(topic))
                        .await
                        .map_err(|e| self.fail(&state, e.to_string()))?;
                    let total_lessons = plan.modules.iter().map(|m| m.num_lessons).sum();
                    self.events.emit(WorkflowEvent::CoursePlanned { total_lessons });
                    CourseEvent::Planned(plan)
                }
                CourseStatus::GeneratingContent { cursor } => {
                    let brief = self
                        .brief(&state, *cursor)
                        .map_err(|e| self.fail(&state, e.to_string()))?;
                    let draft = self
                        .step(&self.writer, brief)
                        .await
                        .map_err(|e| self.fail(&state, e.to_string()))?;
                    CourseEvent::LessonGenerated(draft)
                }
                CourseStatus::Reviewing { cursor, .. } => {
                    let input = self
                        .review_input(&state, *cursor)
                        .map_err(|e| self.fail(&state, e.to_string()))?;
                    let lesson = input.lesson.title.clone();
                    let feedback = self
                        .step(&self.reviewer, input)
                        .await
                        .map_err(|e| self.fail(&state, e.to_string()))?;
                    if !feedback.is_approved {
                        warn!("Review flagged {}: {}", lesson, feedback.feedback);
                    }
                    self.events.emit(WorkflowEvent::LessonReviewed {
                        lesson,
                        approved: feedback.is_approved,
                    });
                    CourseEvent::Reviewed(feedback)
                }
            };
            state = transition(state, event);
        }

        info!(
            "Course generation completed: {} lessons, {} review notes ({})",
            state.course.as_ref().map_or(0, Course::lesson_count),
            state.notes.len(),
            execution_id
        );
        self.events.emit(WorkflowEvent::PipelineCompleted { execution_id });
        Ok(state)
    }

    fn brief(&self, state: &CourseState, cursor: Cursor) -> Result<LessonBrief, StageError> {
        let (module, lesson) = locate(state, cursor, self.writer.name())?;
        Ok(LessonBrief {
            course_topic: state.topic.clone(),
            module_title: module.to_string(),
            lesson_title: lesson.title.clone(),
        })
    }

    fn review_input(&self, state: &CourseState, cursor: Cursor) -> Result<ReviewInput, StageError> {
        let (module, lesson) = locate(state, cursor, self.reviewer.name())?;
        Ok(ReviewInput {
            course_topic: state.topic.clone(),
            module_title: module.to_string(),
            lesson: lesson.clone(),
        })
    }

    async fn step<S: Stage>(&self, stage: &S, input: S::Input) -> Result<S::Output, StageError> {
        let name = stage.name();
        info!("Running stage: {}", name);
        self.events.emit(WorkflowEvent::StageStarted { stage: name });
        let output = stage.run(input).await?;
        self.events.emit(WorkflowEvent::StageCompleted { stage: name });
        Ok(output)
    }

    fn fail(&self, state: &CourseState, message: String) -> WorkflowError {
        error!("Course generation failed: {}", message);
        self.events.emit(WorkflowEvent::PipelineFailed {
            execution_id: state.execution_id,
            error: message.clone(),
        });
        WorkflowError::Course(message)
    }
}

fn locate<'a>(
    state: &'a CourseState,
    cursor: Cursor,
    stage: &'static str,
) -> Result<(&'a str, &'a Lesson), StageError> {
    let course = state.course.as_ref().ok_or_else(|| StageError::Structural {
        stage,
        message: "course structure is required for content generation".to_string(),
    })?;
    let module = course.module(cursor.module);
    let lesson = course.lesson(cursor.module, cursor.lesson);
    match (module, lesson) {
        (Some(m), Some(l)) => Ok((m.title.as_str(), l)),
        _ => Err(StageError::Structural {
            stage,
            message: format!(
                "no lesson at module {} lesson {}",
                cursor.module, cursor.lesson
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::StubClient;
    use std::sync::Mutex;

    #[tokio::test]
    async fn test_stub_course_fills_every_lesson() {
        let workflow = CourseWorkflow::new(Arc::new(StubClient::new()), "gpt-4");
        let state = workflow.run("Rust").await.unwrap();
        assert_eq!(state.status, CourseStatus::Done);

        let course = state.course.unwrap();
        assert_eq!(course.modules.len(), 2);
        assert_eq!(course.lesson_count(), 7);
        let lesson = course.lesson(1, 3).unwrap();
        assert_eq!(lesson.title, "Lesson 4");
        assert_eq!(lesson.summary, "Lesson 4 in Advanced Rust (Rust)");
    }

    #[tokio::test]
    async fn test_review_can_be_disabled() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let workflow = CourseWorkflow::new(Arc::new(StubClient::new()), "gpt-4")
            .with_review(false)
            .on_event(move |e| sink.lock().unwrap().push(e));

        workflow.generate_course("Rust").await.unwrap();

        let events = seen.lock().unwrap();
        assert!(events.contains(&WorkflowEvent::CoursePlanned { total_lessons: 7 }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, WorkflowEvent::LessonReviewed { .. })));
    }
}
