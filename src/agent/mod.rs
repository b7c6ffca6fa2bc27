//! Language model clients used by the generation stages

pub mod client;
pub mod ollama_client;
pub mod response;
pub mod stub_client;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use client::{AgentClientConfig, Backend};
pub use ollama_client::OllamaClient;
pub use response::{extract_json, AgentError};
pub use stub_client::StubClient;

/// Describes the target type of a structured generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaSpec {
    /// Type name, also used by the stub client to pick a canned response
    pub name: &'static str,

    /// JSON skeleton of the expected object, embedded in the model instructions
    pub shape: &'static str,
}

/// A single structured generation request
#[derive(Debug, Clone)]
pub struct StructuredRequest<'a> {
    pub schema: SchemaSpec,
    pub prompt: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    /// Named input values of the calling stage
    pub context: &'a Map<String, Value>,
}

/// The generation capability: text in, text or schema-shaped JSON out
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Free-form text completion
    async fn generate(&self, prompt: &str, model: &str, temperature: f32) -> Result<String, AgentError>;

    /// Completion constrained to a JSON object shaped like `request.schema`
    ///
    /// Callers decode and validate the returned value themselves.
    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<Value, AgentError>;
}

/// Build the configured model client
pub fn build_client(config: &AgentClientConfig) -> Result<Arc<dyn LanguageModel>, AgentError> {
    match config.backend {
        Backend::Stub => Ok(Arc::new(StubClient::new())),
        Backend::Ollama => Ok(Arc::new(OllamaClient::new(config.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_stub_client() {
        let client = build_client(&AgentClientConfig::default()).unwrap();
        let text = client.generate("Say hello", "gpt-4", 0.7).await.unwrap();
        assert!(text.contains("Say hello"));
    }

    #[test]
    fn test_build_ollama_client() {
        let config = AgentClientConfig::new()
            .with_backend(Backend::Ollama)
            .with_endpoint("http://localhost:11434".to_string());
        assert!(build_client(&config).is_ok());
    }
}
