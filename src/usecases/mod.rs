//! Use cases: run a workflow and shape its result for the HTTP layer

pub mod course;
pub mod lesson;

pub use course::GenerateCourseContent;
pub use lesson::GenerateLesson;
