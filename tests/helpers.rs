//! Test utilities shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use coursegen::agent::{AgentError, LanguageModel, StructuredRequest, StubClient};
use coursegen::execution::WorkflowEvent;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// A structured call as the model saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub schema: &'static str,
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub context: Map<String, Value>,
}

/// Model that replays scripted answers per schema
///
/// Schemas without a scripted answer fall through to the stub client.
/// Calls are recorded in order.
#[derive(Default)]
pub struct MockModel {
    scripted: Mutex<HashMap<&'static str, VecDeque<Value>>>,
    failures: HashSet<&'static str>,
    calls: Mutex<Vec<RecordedCall>>,
    fallback: StubClient,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next call with `schema`
    pub fn respond(self, schema: &'static str, value: Value) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(schema)
            .or_default()
            .push_back(value);
        self
    }

    /// Make every call with `schema` fail
    pub fn fail_on(mut self, schema: &'static str) -> Self {
        self.failures.insert(schema);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn schemas(&self) -> Vec<&'static str> {
        self.calls().iter().map(|c| c.schema).collect()
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn generate(&self, prompt: &str, model: &str, temperature: f32) -> Result<String, AgentError> {
        self.fallback.generate(prompt, model, temperature).await
    }

    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<Value, AgentError> {
        let name = request.schema.name;
        self.calls.lock().unwrap().push(RecordedCall {
            schema: name,
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
            temperature: request.temperature,
            context: request.context.clone(),
        });

        if self.failures.contains(name) {
            return Err(AgentError::Api("model unavailable".to_string()));
        }

        let scripted = self.scripted.lock().unwrap().get_mut(name).and_then(VecDeque::pop_front);
        match scripted {
            Some(value) => Ok(value),
            None => self.fallback.generate_structured(request).await,
        }
    }
}

/// Collects workflow events for later assertions
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<WorkflowEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Fn(WorkflowEvent) + Send + Sync + 'static {
        let events = self.events.clone();
        move |event| events.lock().unwrap().push(event)
    }

    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn failures(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, WorkflowEvent::PipelineFailed { .. }))
            .count()
    }
}

/// Assert that a wrapped error message carries exactly one wrapper prefix
pub fn assert_wrapped_once(message: &str, prefix: &str) {
    assert!(message.starts_with(prefix), "unexpected message: {}", message);
    assert_eq!(message.matches(prefix).count(), 1, "wrapped twice: {}", message);
}
