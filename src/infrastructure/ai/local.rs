//! Local inference daemon backend (Ollama wire protocol).

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::{extract_error_message, AiProvider, GenerateOptions, ModelInfo};
use crate::error::{AppError, Result};

pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";

/// Backend speaking to a locally running inference daemon.
///
/// No authentication, and deliberately no client-side timeout: local
/// generation on modest hardware can run for minutes and a slow answer
/// beats a spurious abort.
pub struct LocalProvider {
    client: reqwest::Client,
    base_url: String,
}

impl LocalProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for LocalProvider {
    fn default() -> Self {
        Self::new(DEFAULT_LOCAL_BASE_URL)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: SamplingOptions,
}

#[derive(Serialize)]
struct SamplingOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

#[async_trait]
impl AiProvider for LocalProvider {
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ai_unavailable(format!("Local AI daemon unreachable: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("model listing failed with status {}", status));
            return Err(AppError::ai_request(message));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .into_iter()
            .map(|m| ModelInfo::new(m.name.clone(), m.name))
            .collect())
    }

    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: GenerateOptions,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        debug!("Local generate: model={}, {} prompt bytes", model, prompt.len());

        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: SamplingOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("generation failed with status {}", status));
            return Err(AppError::ai_request(message));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}
