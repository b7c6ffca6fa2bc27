//! Workflow progress events

use std::sync::Arc;
use uuid::Uuid;

/// Events emitted while a workflow runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline: &'static str,
    },
    StageStarted {
        stage: &'static str,
    },
    StageCompleted {
        stage: &'static str,
    },
    CoursePlanned {
        total_lessons: usize,
    },
    LessonReviewed {
        lesson: String,
        approved: bool,
    },
    PipelineCompleted {
        execution_id: Uuid,
    },
    PipelineFailed {
        execution_id: Uuid,
        error: String,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(WorkflowEvent) + Send + Sync>;

/// Fans events out to the registered handlers
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler<F>(&mut self, handler: F)
    where
        F: Fn(WorkflowEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Arc::new(handler));
    }

    pub fn emit(&self, event: WorkflowEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_every_handler_sees_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for _ in 0..2 {
            let seen = seen.clone();
            bus.add_handler(move |e| seen.lock().unwrap().push(e));
        }

        bus.emit(WorkflowEvent::StageStarted { stage: "plan_course" });
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
