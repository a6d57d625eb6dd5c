//! AI provider adapter.
//!
//! Two interchangeable backends expose the same capability set: a
//! local inference daemon (no auth) and a hosted multi-model catalog
//! (API key). The derived operations (summarize, translate, format)
//! live in [`processor`].

pub mod hosted;
pub mod local;
pub mod processor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use hosted::HostedProvider;
pub use local::LocalProvider;
pub use processor::AiProcessor;

/// A model offered by a backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: None,
        }
    }
}

/// Sampling options forwarded to the backend.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

/// Uniform interface over the AI backends.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// List the models the backend offers.
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;

    /// Generate a completion for `prompt` with the given model.
    async fn generate(&self, prompt: &str, model: &str, options: GenerateOptions)
        -> Result<String>;
}

/// Pull a human-readable error message out of a backend error body.
///
/// Backends disagree on shape: `{"error": "..."}`,
/// `{"error": {"message": "..."}}` and `{"message": "..."}` all occur.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if let Some(msg) = value.get("error").and_then(|e| e.as_str()) {
        return Some(msg.to_string());
    }
    if let Some(msg) = value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(msg.to_string());
    }
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_shapes() {
        assert_eq!(
            extract_error_message(r#"{"error": "model not found"}"#).as_deref(),
            Some("model not found")
        );
        assert_eq!(
            extract_error_message(r#"{"error": {"message": "bad key"}}"#).as_deref(),
            Some("bad key")
        );
        assert_eq!(
            extract_error_message(r#"{"message": "too many requests"}"#).as_deref(),
            Some("too many requests")
        );
        assert_eq!(extract_error_message("not json"), None);
    }

    #[test]
    fn test_generate_options_defaults() {
        let options = GenerateOptions::default();
        assert_eq!(options.temperature, 0.3);
        assert_eq!(options.max_tokens, 1000);
    }
}
