//! Ollama-compatible HTTP client

use crate::agent::{extract_json, AgentClientConfig, AgentError, LanguageModel, StructuredRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for an Ollama-compatible `/api/generate` + `/api/chat` endpoint
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns `AgentError::Internal` if no endpoint is configured or the
    /// HTTP client cannot be built.
    pub fn new(config: AgentClientConfig) -> Result<Self, AgentError> {
        let endpoint = config
            .endpoint
            .ok_or_else(|| AgentError::Internal("ollama backend requires an endpoint".to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, AgentError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("POST {}", url);

        let resp = self.http.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                AgentError::Timeout(self.timeout_secs)
            } else {
                AgentError::Api(format!("Failed to connect to model at {}: {}", url, e))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("model returned {}: {}", status, text.trim());
            return Err(AgentError::Api(format!(
                "model returned error {}: {}",
                status,
                text.trim()
            )));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| AgentError::Decode(format!("invalid response body: {}", e)))
    }
}

/// System message instructing the model to answer with a single JSON object
fn schema_instructions(request: &StructuredRequest<'_>) -> String {
    format!(
        "Respond with a single JSON object of type {} and nothing else. \
         It must have this shape:\n{}",
        request.schema.name, request.schema.shape
    )
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str, model: &str, temperature: f32) -> Result<String, AgentError> {
        let body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": temperature },
        });

        let response = self.post("/api/generate", &body).await?;
        response
            .get("response")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| AgentError::Decode("missing 'response' field".to_string()))
    }

    async fn generate_structured(&self, request: StructuredRequest<'_>) -> Result<Value, AgentError> {
        let body = json!({
            "model": request.model,
            "stream": false,
            "format": "json",
            "messages": [
                { "role": "system", "content": schema_instructions(&request) },
                { "role": "user", "content": request.prompt },
            ],
            "options": { "temperature": request.temperature },
        });

        let response = self.post("/api/chat", &body).await?;
        let content = response
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::Decode("missing 'message.content' field".to_string()))?;

        debug!(
            "{} response: {} bytes",
            request.schema.name,
            content.len()
        );
        extract_json(content)
    }
}
