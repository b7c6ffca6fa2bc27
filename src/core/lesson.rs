//! Lesson domain aggregates

use crate::core::validation::{self, Validate, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A content section as produced by the body stage, kept as a loose map
pub type SectionMap = Map<String, Value>;

/// Difficulty level of a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(ValidationError::new(
                "difficulty",
                format!(
                    "'{}' is not one of beginner, intermediate, advanced",
                    other
                ),
            )),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single learning objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    pub description: String,
    #[serde(default)]
    pub key_concept: String,
}

impl Validate for LearningObjective {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("description", &self.description)
    }
}

/// A real-world example or case study
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    pub description: String,
    pub key_takeaway: String,
}

impl Validate for Example {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("title", &self.title)
    }
}

/// A multiple choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuizQuestion")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub const MIN_OPTIONS: usize = 3;
    pub const MAX_OPTIONS: usize = 5;

    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let q = Self {
            question: question.into(),
            options,
            correct_answer,
            explanation: explanation.into(),
        };
        q.validate()?;
        Ok(q)
    }
}

#[derive(Deserialize)]
struct RawQuizQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl TryFrom<RawQuizQuestion> for QuizQuestion {
    type Error = ValidationError;

    fn try_from(raw: RawQuizQuestion) -> Result<Self, Self::Error> {
        QuizQuestion::new(raw.question, raw.options, raw.correct_answer, raw.explanation)
    }
}

impl Validate for QuizQuestion {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("question", &self.question)?;
        validation::len_between(
            "options",
            self.options.len(),
            Self::MIN_OPTIONS,
            Self::MAX_OPTIONS,
        )?;
        if self.correct_answer >= self.options.len() {
            return Err(ValidationError::new(
                "correct_answer",
                format!(
                    "index {} is out of range for {} options",
                    self.correct_answer,
                    self.options.len()
                ),
            ));
        }
        Ok(())
    }
}

/// A complete lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLessonContent")]
pub struct LessonContent {
    pub topic: String,
    pub difficulty: Difficulty,
    pub learning_objectives: Vec<LearningObjective>,
    pub content_sections: Vec<SectionMap>,
    pub examples: Vec<Example>,
    pub quiz_questions: Vec<QuizQuestion>,
    pub summary: String,
    pub estimated_duration_minutes: u32,
}

impl LessonContent {
    pub const MAX_OBJECTIVES: usize = 5;
    pub const MAX_EXAMPLES: usize = 3;
    pub const MAX_QUIZ_QUESTIONS: usize = 5;
    pub const MIN_DURATION_MINUTES: u32 = 5;
    pub const MAX_DURATION_MINUTES: u32 = 120;

    /// Build a lesson, failing if any cardinality or range constraint is violated
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        topic: impl Into<String>,
        difficulty: Difficulty,
        learning_objectives: Vec<LearningObjective>,
        content_sections: Vec<SectionMap>,
        examples: Vec<Example>,
        quiz_questions: Vec<QuizQuestion>,
        summary: impl Into<String>,
        estimated_duration_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let lesson = Self {
            topic: topic.into(),
            difficulty,
            learning_objectives,
            content_sections,
            examples,
            quiz_questions,
            summary: summary.into(),
            estimated_duration_minutes,
        };
        lesson.validate()?;
        Ok(lesson)
    }
}

#[derive(Deserialize)]
struct RawLessonContent {
    topic: String,
    difficulty: Difficulty,
    learning_objectives: Vec<LearningObjective>,
    content_sections: Vec<SectionMap>,
    examples: Vec<Example>,
    quiz_questions: Vec<QuizQuestion>,
    summary: String,
    estimated_duration_minutes: u32,
}

impl TryFrom<RawLessonContent> for LessonContent {
    type Error = ValidationError;

    fn try_from(raw: RawLessonContent) -> Result<Self, Self::Error> {
        LessonContent::new(
            raw.topic,
            raw.difficulty,
            raw.learning_objectives,
            raw.content_sections,
            raw.examples,
            raw.quiz_questions,
            raw.summary,
            raw.estimated_duration_minutes,
        )
    }
}

impl Validate for LessonContent {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)?;
        validation::len_between(
            "learning_objectives",
            self.learning_objectives.len(),
            1,
            Self::MAX_OBJECTIVES,
        )?;
        validation::each("learning_objectives", &self.learning_objectives)?;
        validation::len_between("examples", self.examples.len(), 1, Self::MAX_EXAMPLES)?;
        validation::each("examples", &self.examples)?;
        validation::len_between(
            "quiz_questions",
            self.quiz_questions.len(),
            1,
            Self::MAX_QUIZ_QUESTIONS,
        )?;
        validation::each("quiz_questions", &self.quiz_questions)?;
        validation::in_range(
            "estimated_duration_minutes",
            self.estimated_duration_minutes,
            Self::MIN_DURATION_MINUTES,
            Self::MAX_DURATION_MINUTES,
        )
    }
}
