//! Workflow errors

use thiserror::Error;

/// The single error a workflow reports to its caller
///
/// Carries the message of the stage failure that aborted the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Failed to generate lesson: {0}")]
    Lesson(String),

    #[error("Failed to generate course: {0}")]
    Course(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            WorkflowError::Lesson("model offline".to_string()).to_string(),
            "Failed to generate lesson: model offline"
        );
        assert_eq!(
            WorkflowError::Course("no modules".to_string()).to_string(),
            "Failed to generate course: no modules"
        );
    }
}
