//! Quiz generation

use super::default_audience;
use super::lesson_body::LessonSection;
use crate::agent::SchemaSpec;
use crate::core::lesson::{LearningObjective, QuizQuestion};
use crate::core::validation::{self, Validate, ValidationError};
use crate::stages::{prompt, Generator, OutputSchema, Stage, StageError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

const INSTRUCTIONS: &str = "You are an expert assessment designer. Write quiz \
questions that check understanding of the learning objectives. Every question has \
between 3 and 5 answer options, the zero-based index of the correct option and an \
explanation of why it is correct.";

pub const MAX_QUESTIONS: usize = 10;

fn default_num_questions() -> usize {
    3
}

fn default_question_types() -> Vec<String> {
    vec!["multiple_choice".to_string()]
}

fn default_difficulty() -> String {
    "medium".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCreatorInput {
    pub topic: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    pub learning_objectives: Vec<LearningObjective>,
    #[serde(default)]
    pub content_sections: Vec<LessonSection>,
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    #[serde(default = "default_question_types")]
    pub question_types: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

impl Validate for QuizCreatorInput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::non_empty("topic", &self.topic)?;
        validation::len_at_least("learning_objectives", self.learning_objectives.len(), 1)?;
        validation::in_range("num_questions", self.num_questions, 1, MAX_QUESTIONS)
    }
}

/// A question as the model wrote it, possibly incomplete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftQuestion {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub correct_answer: Option<i64>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
}

impl DraftQuestion {
    /// The question, if every field is present and it forms a valid `QuizQuestion`
    fn accept(&self) -> Option<QuizQuestion> {
        let correct = usize::try_from(self.correct_answer?).ok()?;
        QuizQuestion::new(
            self.question.clone()?,
            self.options.clone()?,
            correct,
            self.explanation.clone()?,
        )
        .ok()
    }
}

/// Raw quiz returned by the model, filtered before use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizDraft {
    #[serde(default)]
    pub questions: Vec<DraftQuestion>,
    #[serde(default)]
    pub assessment_criteria: BTreeMap<String, String>,
}

impl Validate for QuizDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl OutputSchema for QuizDraft {
    const SCHEMA: SchemaSpec = SchemaSpec {
        name: "QuizDraft",
        shape: r#"{"questions": [{"question": "string", "options": ["string", "string", "string", "string"], "correct_answer": 0, "explanation": "string", "learning_objectives": ["string"]}], "assessment_criteria": {"criterion": "description"}}"#,
    };
}

/// Answer key entry for one kept question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKeyEntry {
    pub correct_answer: usize,
    pub explanation: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizCreatorOutput {
    pub questions: Vec<QuizQuestion>,
    /// Keyed by position in `questions`
    pub answer_key: BTreeMap<usize, AnswerKeyEntry>,
    #[serde(default)]
    pub assessment_criteria: BTreeMap<String, String>,
}

impl QuizCreatorOutput {
    /// Keep the well-formed questions of a draft and index the answer key over them
    pub fn from_draft(draft: QuizDraft) -> Self {
        let mut questions = Vec::new();
        let mut answer_key = BTreeMap::new();

        for draft_question in &draft.questions {
            if let Some(question) = draft_question.accept() {
                answer_key.insert(
                    questions.len(),
                    AnswerKeyEntry {
                        correct_answer: question.correct_answer,
                        explanation: question.explanation.clone(),
                        learning_objectives: draft_question.learning_objectives.clone(),
                    },
                );
                questions.push(question);
            }
        }

        let dropped = draft.questions.len() - questions.len();
        if dropped > 0 {
            warn!("discarded {} malformed quiz question(s)", dropped);
        }

        Self {
            questions,
            answer_key,
            assessment_criteria: draft.assessment_criteria,
        }
    }
}

impl Validate for QuizCreatorOutput {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::len_between("questions", self.questions.len(), 1, MAX_QUESTIONS)?;
        validation::each("questions", &self.questions)
    }
}

/// Writes the quiz for the lesson
pub struct QuizCreator {
    generator: Generator,
}

impl QuizCreator {
    pub fn new(generator: Generator) -> Self {
        Self { generator }
    }

    pub fn prompt(&self, input: &QuizCreatorInput) -> String {
        format!(
            "{}\n\nTopic: {}\nTarget Audience: {}\nDifficulty: {}\n\nLearning Objectives:\n{}\n\nContent Overview:\n{}\n\n\
             Question Types: {}\nNumber of Questions: {}\n\nPlease provide your response in the specified JSON format.",
            INSTRUCTIONS,
            input.topic,
            input.target_audience,
            input.difficulty,
            prompt::objectives_list(&input.learning_objectives),
            prompt::sections_overview(&input.content_sections),
            input.question_types.join(", "),
            input.num_questions,
        )
    }
}

#[async_trait]
impl Stage for QuizCreator {
    type Input = QuizCreatorInput;
    type Output = QuizCreatorOutput;

    fn name(&self) -> &'static str {
        "create_quiz"
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        let prompt = self.prompt(&input);
        let draft: QuizDraft = self.generator.generate(self.name(), &prompt, &input).await?;

        let output = QuizCreatorOutput::from_draft(draft);
        output
            .validate()
            .map_err(|source| StageError::validation(self.name(), source))?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> QuizDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_malformed_questions_dropped_and_key_reindexed() {
        let draft = draft(json!({
            "questions": [
                {"question": "Missing options?", "correct_answer": 0, "explanation": "x"},
                {"question": "Good?", "options": ["a", "b", "c"], "correct_answer": 2, "explanation": "c", "learning_objectives": ["obj"]},
                {"question": "Out of range?", "options": ["a", "b", "c"], "correct_answer": 3, "explanation": "x"},
                {"question": "Negative?", "options": ["a", "b", "c"], "correct_answer": -1, "explanation": "x"},
                {"question": "Also good?", "options": ["a", "b", "c", "d"], "correct_answer": 1, "explanation": "b"}
            ]
        }));

        let output = QuizCreatorOutput::from_draft(draft);
        assert_eq!(output.questions.len(), 2);
        assert_eq!(output.questions[0].question, "Good?");
        assert_eq!(output.answer_key.len(), 2);
        assert_eq!(output.answer_key[&0].correct_answer, 2);
        assert_eq!(output.answer_key[&0].learning_objectives, vec!["obj".to_string()]);
        assert_eq!(output.answer_key[&1].explanation, "b");
    }

    #[test]
    fn test_kept_questions_satisfy_invariants() {
        let draft = draft(json!({
            "questions": [
                {"question": "Two options?", "options": ["a", "b"], "correct_answer": 0, "explanation": "x"},
                {"question": "Six options?", "options": ["a", "b", "c", "d", "e", "f"], "correct_answer": 0, "explanation": "x"},
                {"question": "Fine?", "options": ["a", "b", "c", "d", "e"], "correct_answer": 4, "explanation": "e"}
            ]
        }));

        let output = QuizCreatorOutput::from_draft(draft);
        assert_eq!(output.questions.len(), 1);
        for q in &output.questions {
            assert!((3..=5).contains(&q.options.len()));
            assert!(q.correct_answer < q.options.len());
        }
    }

    #[test]
    fn test_empty_after_filtering_is_invalid() {
        let output = QuizCreatorOutput::from_draft(QuizDraft::default());
        assert_eq!(output.validate().unwrap_err().field, "questions");
    }

    #[test]
    fn test_input_defaults() {
        let input: QuizCreatorInput = serde_json::from_value(json!({
            "topic": "Graphs",
            "learning_objectives": [{"description": "Traverse a graph"}],
        }))
        .unwrap();
        assert_eq!(input.num_questions, 3);
        assert_eq!(input.question_types, vec!["multiple_choice".to_string()]);
        assert_eq!(input.difficulty, "medium");
        assert!(input.validate().is_ok());
    }
}
