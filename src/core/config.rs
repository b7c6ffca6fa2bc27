//! Service settings from YAML and the environment

use crate::agent::{AgentClientConfig, Backend};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub backend: Backend,

    /// Base URL of the model API, required by the ollama backend
    pub endpoint: Option<String>,

    /// Model name passed to every generation call
    pub model: String,

    pub temperature: f32,

    /// Timeout for a single model request in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Stub,
            endpoint: None,
            model: "gpt-4".to_string(),
            temperature: 0.7,
            timeout_secs: 300,
        }
    }
}

impl LlmSettings {
    pub fn client_config(&self) -> AgentClientConfig {
        let mut config = AgentClientConfig::new()
            .with_backend(self.backend)
            .with_timeout(self.timeout_secs);
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        config
    }
}

/// Top-level service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub env: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; any origin when empty
    pub cors_origins: Vec<String>,

    pub llm: LlmSettings,

    /// Review each generated course lesson
    pub review: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "coursegen".to_string(),
            env: "development".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
            llm: LlmSettings::default(),
            review: true,
        }
    }
}

impl Settings {
    /// Default settings file: `<config dir>/coursegen/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("coursegen").join("config.yaml"))
    }

    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve the effective settings
    ///
    /// Reads `path` when given, otherwise the default file if it exists,
    /// then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Override fields from environment variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = lookup("APP_ENV") {
            self.env = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.port = v.parse().with_context(|| format!("Invalid PORT: {}", v))?;
        }
        if let Some(v) = lookup("LLM_BACKEND") {
            self.llm.backend = serde_yaml::from_str(&v).with_context(|| format!("Invalid LLM_BACKEND: {}", v))?;
        }
        if let Some(v) = lookup("LLM_ENDPOINT") {
            self.llm.endpoint = Some(v);
        }
        if let Some(v) = lookup("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = lookup("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = v
                .parse()
                .with_context(|| format!("Invalid LLM_TIMEOUT_SECS: {}", v))?;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }
        if self.llm.model.trim().is_empty() {
            anyhow::bail!("llm.model must not be empty");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            anyhow::bail!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            );
        }
        if self.llm.backend == Backend::Ollama && self.llm.endpoint.is_none() {
            anyhow::bail!("llm.endpoint is required for the ollama backend");
        }
        Ok(())
    }

    /// `host:port` to bind the HTTP server to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
