//! Pipeline runners

pub mod course_machine;
pub mod course_workflow;
pub mod error;
pub mod events;
pub mod lesson_workflow;
pub mod state;

pub use course_machine::{transition, CourseEvent};
pub use course_workflow::CourseWorkflow;
pub use error::WorkflowError;
pub use events::{EventBus, EventHandler, WorkflowEvent};
pub use lesson_workflow::{LessonRequest, LessonWorkflow, WORKFLOW_VERSION};
pub use state::{CourseState, CourseStatus, Cursor, ExecutionStatus, LessonState};
