//! AI transformations over clipboard items.
//!
//! The processor owns one backend and one selected model and exposes
//! the three item-level operations. Every operation returns a copy of
//! the input item with exactly one field replaced; the caller decides
//! whether to commit the copy to history.

use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{AiProvider, GenerateOptions, HostedProvider, LocalProvider, ModelInfo};
use crate::config::{ProviderKind, Settings};
use crate::core::content_type::ContentType;
use crate::error::{AppError, Result};
use crate::models::ClipboardItem;

pub struct AiProcessor {
    provider: Arc<dyn AiProvider>,
    model: String,
    options: GenerateOptions,
    is_processing: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl std::fmt::Debug for AiProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiProcessor")
            .field("model", &self.model)
            .field("options", &self.options)
            .field("is_processing", &self.is_processing)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl AiProcessor {
    pub fn new(provider: Arc<dyn AiProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            options: GenerateOptions::default(),
            is_processing: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Build a processor from the current settings.
    ///
    /// Fails with `AiUnavailable` when the configuration cannot yield a
    /// working backend: no model selected, or the hosted backend chosen
    /// without an API key.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = settings
            .provider
            .model
            .clone()
            .ok_or_else(|| AppError::ai_unavailable("No model selected"))?;

        let provider: Arc<dyn AiProvider> = match settings.provider.kind {
            ProviderKind::Local => {
                Arc::new(LocalProvider::new(settings.provider.local_base_url.clone()))
            }
            ProviderKind::Hosted => {
                let api_key = settings
                    .provider
                    .api_key
                    .clone()
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        AppError::ai_unavailable("Hosted AI backend requires an API key")
                    })?;
                Arc::new(HostedProvider::new(
                    settings.provider.hosted_base_url.clone(),
                    api_key,
                ))
            }
        };

        Ok(Self::new(provider, model))
    }

    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.provider.list_models().await
    }

    /// Summarize the item's content into its `summary` field.
    pub async fn summarize(&self, item: &ClipboardItem) -> Result<ClipboardItem> {
        let prompt = format!(
            "Create a concise summary of the following content while preserving key information:\n\n{}",
            item.content
        );
        let summary = self.run(&prompt).await?;
        info!("Summarized item {}", item.id);
        Ok(item.with_summary(summary))
    }

    /// Translate the item's content into its `translated` field.
    pub async fn translate(
        &self,
        item: &ClipboardItem,
        target_language: &str,
    ) -> Result<ClipboardItem> {
        let prompt = format!(
            "Translate the following content to {}:\n\n{}",
            target_language, item.content
        );
        let translated = self.run(&prompt).await?;
        info!("Translated item {} to {}", item.id, target_language);
        Ok(item.with_translation(translated))
    }

    /// Reformat a code item in place, replacing its `content`.
    ///
    /// Non-code items pass through unchanged without touching the
    /// backend.
    pub async fn format_code(&self, item: &ClipboardItem) -> Result<ClipboardItem> {
        if item.content_type != ContentType::Code {
            return Ok(item.clone());
        }
        let prompt = format!(
            "Format and clean up this code while preserving its functionality. Return only the formatted code without explanations:\n\n{}",
            item.content
        );
        let formatted = self.run(&prompt).await?;
        info!("Formatted code item {}", item.id);
        Ok(item.with_content(formatted))
    }

    /// Whether an operation is currently in flight.
    pub fn is_processing(&self) -> bool {
        self.is_processing.load(Ordering::SeqCst)
    }

    /// Message of the most recent failed operation, cleared when a new
    /// one starts.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }

    /// Single-flight generation: at most one operation per processor
    /// instance at a time, a second trigger fails fast instead of
    /// queueing.
    async fn run(&self, prompt: &str) -> Result<String> {
        if self
            .is_processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::ai_request("An AI operation is already running"));
        }

        if let Ok(mut guard) = self.last_error.lock() {
            *guard = None;
        }

        let result = self
            .provider
            .generate(prompt, &self.model, self.options)
            .await;

        if let Err(e) = &result {
            warn!("AI operation failed: {}", e);
            if let Ok(mut guard) = self.last_error.lock() {
                *guard = Some(e.message().to_string());
            }
        }
        self.is_processing.store(false, Ordering::SeqCst);
        result
    }
}
