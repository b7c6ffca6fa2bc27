//! Per-run workflow state

use crate::core::course::Course;
use crate::core::lesson::Difficulty;
use crate::stages::lesson::{
    ExampleGeneratorOutput, LearningObjectivesOutput, LessonAssemblerOutput, LessonBodyOutput,
    QuizCreatorOutput, TopicValidatorOutput,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Overall status of a lesson run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
}

/// Inputs and stage outputs of one lesson pipeline run
///
/// Each stage writes its output into its own slot. A state is created per
/// invocation and never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonState {
    pub execution_id: Uuid,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    pub topic: String,
    pub target_audience: Difficulty,
    pub context: Option<String>,
    pub requested_objectives: Vec<String>,
    pub custom_instructions: Option<String>,

    pub validated_topic: Option<TopicValidatorOutput>,
    pub learning_objectives: Option<LearningObjectivesOutput>,
    pub content_sections: Option<LessonBodyOutput>,
    pub examples: Option<ExampleGeneratorOutput>,
    pub quiz: Option<QuizCreatorOutput>,
    pub assembled: Option<LessonAssemblerOutput>,

    pub metadata: Map<String, Value>,
    pub errors: Vec<String>,
    pub completed_stages: Vec<String>,
}

impl LessonState {
    pub fn new(topic: impl Into<String>, target_audience: Difficulty) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            topic: topic.into(),
            target_audience,
            context: None,
            requested_objectives: Vec::new(),
            custom_instructions: None,
            validated_topic: None,
            learning_objectives: None,
            content_sections: None,
            examples: None,
            quiz: None,
            assembled: None,
            metadata: Map::new(),
            errors: Vec::new(),
            completed_stages: Vec::new(),
        }
    }

    pub fn complete_stage(&mut self, stage: &str) {
        self.completed_stages.push(stage.to_string());
    }

    pub fn complete(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, error: String) {
        self.errors.push(error);
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(Utc::now());
    }
}

/// Position of a lesson within a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub module: usize,
    pub lesson: usize,
}

impl Cursor {
    pub fn new(module: usize, lesson: usize) -> Self {
        Self { module, lesson }
    }

    /// First lesson of the course, skipping modules without lessons
    pub fn first(course: &Course) -> Option<Cursor> {
        Self::first_from(course, 0)
    }

    /// The lesson after this one, moving into the next non-empty module
    /// when the current module is exhausted
    pub fn advance(&self, course: &Course) -> Option<Cursor> {
        let lessons = course.module(self.module).map_or(0, |m| m.lessons.len());
        if self.lesson + 1 < lessons {
            return Some(Cursor::new(self.module, self.lesson + 1));
        }
        Self::first_from(course, self.module + 1)
    }

    fn first_from(course: &Course, module: usize) -> Option<Cursor> {
        course
            .modules
            .iter()
            .enumerate()
            .skip(module)
            .find(|(_, m)| !m.lessons.is_empty())
            .map(|(idx, _)| Cursor::new(idx, 0))
    }
}

/// Where the course pipeline stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Planning,
    GeneratingContent { cursor: Cursor },
    Reviewing { cursor: Cursor, next: Option<Cursor> },
    Done,
    Failed { reason: String },
}

/// State of one course pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseState {
    pub execution_id: Uuid,
    pub topic: String,
    pub course: Option<Course>,
    pub status: CourseStatus,
    /// Review notes, appended as lessons are reviewed
    pub notes: Vec<String>,
    pub review_enabled: bool,
}

impl CourseState {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            topic: topic.into(),
            course: None,
            status: CourseStatus::Planning,
            notes: Vec::new(),
            review_enabled: true,
        }
    }

    pub fn with_review(mut self, enabled: bool) -> Self {
        self.review_enabled = enabled;
        self
    }

    /// True once the last lesson has been filled
    pub fn is_complete(&self) -> bool {
        matches!(
            self.status,
            CourseStatus::Done | CourseStatus::Reviewing { next: None, .. }
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, CourseStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::{Lesson, Module};

    fn module(lessons: usize) -> Module {
        Module {
            title: "M".to_string(),
            description: String::new(),
            lessons: (0..lessons)
                .map(|j| Lesson {
                    title: format!("Lesson {}", j + 1),
                    summary: String::new(),
                    objectives: vec![],
                    key_points: vec![],
                })
                .collect(),
        }
    }

    fn course(sizes: &[usize]) -> Course {
        Course {
            topic: "T".to_string(),
            modules: sizes.iter().map(|&n| module(n)).collect(),
        }
    }

    #[test]
    fn test_cursor_order() {
        let course = course(&[2, 1]);
        let c0 = Cursor::first(&course).unwrap();
        assert_eq!(c0, Cursor::new(0, 0));
        let c1 = c0.advance(&course).unwrap();
        assert_eq!(c1, Cursor::new(0, 1));
        let c2 = c1.advance(&course).unwrap();
        assert_eq!(c2, Cursor::new(1, 0));
        assert_eq!(c2.advance(&course), None);
    }

    #[test]
    fn test_cursor_skips_empty_modules() {
        let course = course(&[0, 1, 0, 2]);
        let c0 = Cursor::first(&course).unwrap();
        assert_eq!(c0, Cursor::new(1, 0));
        assert_eq!(c0.advance(&course), Some(Cursor::new(3, 0)));
    }

    #[test]
    fn test_empty_course_has_no_first_lesson() {
        assert_eq!(Cursor::first(&course(&[])), None);
        assert_eq!(Cursor::first(&course(&[0, 0])), None);
    }

    #[test]
    fn test_lesson_state_lifecycle() {
        let mut state = LessonState::new("Loops", Difficulty::Beginner);
        assert_eq!(state.status, ExecutionStatus::Running);
        state.complete_stage("validate_topic");
        state.fail("boom".to_string());
        assert_eq!(state.status, ExecutionStatus::Failed);
        assert_eq!(state.errors, vec!["boom".to_string()]);
        assert_eq!(state.completed_stages, vec!["validate_topic".to_string()]);
        assert!(state.completed_at.is_some());
    }
}
