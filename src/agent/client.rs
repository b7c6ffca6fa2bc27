//! Model client configuration

use serde::{Deserialize, Serialize};

/// Which model client to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Deterministic offline responses
    #[default]
    Stub,
    /// Ollama-compatible HTTP API
    Ollama,
}

/// Configuration for the model client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentClientConfig {
    pub backend: Backend,

    /// Base URL of the model API (e.g. `http://localhost:11434`)
    ///
    /// Required for the ollama backend, ignored by the stub.
    pub endpoint: Option<String>,

    /// Timeout for a single model request in seconds
    pub timeout_secs: u64,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Stub,
            endpoint: None,
            timeout_secs: 300,
        }
    }
}

impl AgentClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
