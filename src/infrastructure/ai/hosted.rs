//! Hosted model catalog backend (OpenAI-compatible chat protocol).

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{extract_error_message, AiProvider, GenerateOptions, ModelInfo};
use crate::error::{AppError, Result};

pub const DEFAULT_HOSTED_BASE_URL: &str = "https://api.studio.nebius.com/v1";

const SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant that processes text based on specific instructions.";

/// Catalog served when the live model listing cannot be fetched. The
/// UI must always have something to offer in the model picker, so a
/// listing failure degrades to this set instead of an error.
const FALLBACK_MODELS: &[(&str, &str)] = &[
    ("meta-llama/Meta-Llama-3.1-70B-Instruct", "Meta-Llama 3.1 70B Instruct"),
    ("meta-llama/Meta-Llama-3.1-34B-Instruct", "Meta-Llama 3.1 34B Instruct"),
    ("meta-llama/Meta-Llama-3.1-8B-Instruct", "Meta-Llama 3.1 8B Instruct"),
    ("meta-llama/Llama-2-70b-chat-hf", "Llama 2 70B Chat"),
    ("meta-llama/Llama-2-13b-chat-hf", "Llama 2 13B Chat"),
    ("meta-llama/Llama-2-7b-chat-hf", "Llama 2 7B Chat"),
    ("mistralai/Mistral-7B-Instruct-v0.2", "Mistral 7B Instruct v0.2"),
    ("mistralai/Mixtral-8x7B-Instruct-v0.1", "Mixtral 8x7B Instruct v0.1"),
    ("01-ai/Yi-34B-Chat", "Yi 34B Chat"),
    ("01-ai/Yi-6B-Chat", "Yi 6B Chat"),
    ("Qwen/Qwen1.5-72B-Chat", "Qwen 1.5 72B Chat"),
    ("Qwen/Qwen1.5-14B-Chat", "Qwen 1.5 14B Chat"),
    ("Qwen/Qwen1.5-7B-Chat", "Qwen 1.5 7B Chat"),
    ("google/gemma-7b-it", "Gemma 7B Instruct"),
    ("google/gemma-2b-it", "Gemma 2B Instruct"),
];

pub(crate) fn fallback_models() -> Vec<ModelInfo> {
    FALLBACK_MODELS
        .iter()
        .map(|(id, name)| ModelInfo::new(*id, *name))
        .collect()
}

/// Backend speaking to a hosted OpenAI-compatible API.
///
/// Like the local backend, generation requests carry no client-side
/// timeout.
pub struct HostedProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

#[async_trait]
impl AiProvider for HostedProvider {
    /// Fetch the live catalog, degrading to [`FALLBACK_MODELS`] on any
    /// failure (transport, auth, bad payload). Never errors. A
    /// well-formed response is returned as-is, even when its model
    /// list is empty.
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(
                    "Hosted model listing returned {}, serving fallback catalog",
                    r.status()
                );
                return Ok(fallback_models());
            }
            Err(e) => {
                warn!("Hosted model listing failed ({}), serving fallback catalog", e);
                return Ok(fallback_models());
            }
        };

        match response.json::<ModelsResponse>().await {
            Ok(body) => Ok(body.models),
            Err(e) => {
                warn!("Hosted model listing unparsable ({}), serving fallback catalog", e);
                Ok(fallback_models())
            }
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: GenerateOptions,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("Hosted generate: model={}, {} prompt bytes", model, prompt.len());

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body)
                .unwrap_or_else(|| format!("generation failed with status {}", status));
            return Err(AppError::ai_request(message));
        }

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::ai_request("response contained no choices"))
    }
}
