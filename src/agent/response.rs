//! Model response errors and JSON extraction

use serde_json::Value;
use thiserror::Error;

/// Error types for model calls
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Could not decode model output: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Pull a JSON object out of raw model text
///
/// Accepts bare JSON, JSON inside a markdown code fence, or JSON embedded
/// in surrounding prose.
pub fn extract_json(text: &str) -> Result<Value, AgentError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(block) = extract_code_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(&block) {
            return Ok(value);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&trimmed[start..=end]) {
                return Ok(value);
            }
        }
    }

    let preview: String = trimmed.chars().take(200).collect();
    Err(AgentError::Decode(format!(
        "no JSON object found in model output: {}",
        preview
    )))
}

fn extract_code_block(text: &str) -> Option<String> {
    for marker in ["```json", "```JSON", "```"] {
        if let Some(start) = text.find(marker) {
            let content_start = start + marker.len();
            if let Some(end) = text[content_start..].find("```") {
                return Some(text[content_start..content_start + end].trim().to_string());
            }
        }
    }
    None
}
