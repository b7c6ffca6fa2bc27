//! Generation stages
//!
//! A stage is a typed transformation `Input -> Output` backed by at most one
//! call to the language model. Stages never retry: any validation or model
//! failure is returned to the workflow that invoked them.

pub mod course;
pub mod lesson;
pub mod prompt;

use crate::agent::{AgentError, LanguageModel, SchemaSpec, StructuredRequest};
use crate::core::validation::{Validate, ValidationError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Default sampling temperature for generation stages
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A type the model can be asked to produce
pub trait OutputSchema: DeserializeOwned + Validate + Send + 'static {
    const SCHEMA: SchemaSpec;
}

/// Errors raised by a single stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error("stage '{stage}': {source}")]
    Validation {
        stage: &'static str,
        source: ValidationError,
    },

    #[error("stage '{stage}': generation failed: {source}")]
    Generation {
        stage: &'static str,
        source: AgentError,
    },

    #[error("stage '{stage}': could not decode {schema}: {source}")]
    Decode {
        stage: &'static str,
        schema: &'static str,
        source: serde_json::Error,
    },

    #[error("stage '{stage}': {message}")]
    Structural {
        stage: &'static str,
        message: String,
    },

    #[error("stage '{stage}': topic rejected: {reason}")]
    Rejected {
        stage: &'static str,
        reason: String,
    },
}

impl StageError {
    /// Name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Validation { stage, .. }
            | StageError::Generation { stage, .. }
            | StageError::Decode { stage, .. }
            | StageError::Structural { stage, .. }
            | StageError::Rejected { stage, .. } => stage,
        }
    }

    pub fn validation(stage: &'static str, source: ValidationError) -> Self {
        StageError::Validation { stage, source }
    }
}

/// Handle on the model shared by the stages of one workflow
#[derive(Clone)]
pub struct Generator {
    llm: Arc<dyn LanguageModel>,
    model: String,
    temperature: f32,
}

impl Generator {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Ask the model for a `T`, then decode and validate the answer
    ///
    /// `context` is the stage input; it is forwarded to the model client as
    /// named values next to the prompt.
    pub async fn generate<T, C>(&self, stage: &'static str, prompt: &str, context: &C) -> Result<T, StageError>
    where
        T: OutputSchema,
        C: Serialize + Sync + ?Sized,
    {
        let context = to_context(stage, context)?;
        debug!("[{}] prompt ({} chars):\n{}", stage, prompt.len(), prompt);

        let value = self
            .llm
            .generate_structured(StructuredRequest {
                schema: T::SCHEMA,
                prompt,
                model: &self.model,
                temperature: self.temperature,
                context: &context,
            })
            .await
            .map_err(|source| StageError::Generation { stage, source })?;

        let output: T = serde_json::from_value(value).map_err(|source| StageError::Decode {
            stage,
            schema: T::SCHEMA.name,
            source,
        })?;
        output
            .validate()
            .map_err(|source| StageError::validation(stage, source))?;

        info!("[{}] produced {}", stage, T::SCHEMA.name);
        Ok(output)
    }
}

fn to_context<C: Serialize + ?Sized>(stage: &'static str, context: &C) -> Result<Map<String, Value>, StageError> {
    match serde_json::to_value(context) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(StageError::Structural {
            stage,
            message: format!("stage input is not serializable: {}", e),
        }),
    }
}

/// Build and validate a stage input from a mapping of named values
pub fn parse_input<T>(stage: &'static str, input: Map<String, Value>) -> Result<T, StageError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(Value::Object(input))
        .map_err(|e| StageError::validation(stage, ValidationError::new("input", e.to_string())))?;
    parsed
        .validate()
        .map_err(|source| StageError::validation(stage, source))?;
    Ok(parsed)
}

/// A single typed generation step
#[async_trait]
pub trait Stage: Send + Sync {
    type Input: DeserializeOwned + Validate + Send + Sync + 'static;
    type Output: Send + 'static;

    /// Stage name as it appears in workflow state, events and errors
    fn name(&self) -> &'static str;

    /// Produce the output for an already validated input
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError>;

    /// Validate a typed input, then execute
    async fn run(&self, input: Self::Input) -> Result<Self::Output, StageError> {
        input
            .validate()
            .map_err(|source| StageError::validation(self.name(), source))?;
        self.execute(input).await
    }

    /// Build the input from named values, then execute
    async fn process(&self, input: Map<String, Value>) -> Result<Self::Output, StageError> {
        let input = parse_input::<Self::Input>(self.name(), input)?;
        self.execute(input).await
    }
}
