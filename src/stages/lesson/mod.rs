//! Stages of the lesson pipeline

pub mod example_generator;
pub mod learning_objectives;
pub mod lesson_assembler;
pub mod lesson_body;
pub mod quiz_creator;
pub mod topic_validator;

pub use example_generator::{ExampleGenerator, ExampleGeneratorInput, ExampleGeneratorOutput, Resource};
pub use learning_objectives::{LearningObjectives, LearningObjectivesInput, LearningObjectivesOutput};
pub use lesson_assembler::{LessonAssembler, LessonAssemblerInput, LessonAssemblerOutput};
pub use lesson_body::{LessonBody, LessonBodyInput, LessonBodyOutput, LessonSection};
pub use quiz_creator::{AnswerKeyEntry, QuizCreator, QuizCreatorInput, QuizCreatorOutput, QuizDraft};
pub use topic_validator::{TopicValidator, TopicValidatorInput, TopicValidatorOutput};

pub(crate) fn default_audience() -> String {
    "beginner".to_string()
}
