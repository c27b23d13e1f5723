// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter for Parley.
//!
//! Implements [`ProviderAdapter`] for the Chat Completions API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use parley_config::model::OpenAiConfig;
use parley_core::{
    ParleyError, ProviderAdapter, ProviderFailure, ProviderKind, ProviderRequest, ProviderResult,
    TokenUsage,
};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Model used when the configured model is the `default` alias.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Map a configured model name to the id sent on the wire.
pub fn resolve_model(alias: &str) -> String {
    parley_core::resolve_model(alias, DEFAULT_MODEL)
}

/// OpenAI provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiProvider {
    /// Fails with `ProviderUnavailable` when no API key is configured.
    pub fn new(config: &OpenAiConfig) -> Result<Self, ParleyError> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| ParleyError::ProviderUnavailable {
                provider: ProviderKind::OpenAi.to_string(),
            })?;

        let client = OpenAiClient::new(
            api_key,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        let model = resolve_model(&config.model);

        info!(model = %model, "OpenAI provider initialized");

        Ok(Self { client, model })
    }

    #[cfg(test)]
    fn with_client(client: OpenAiClient, model: &str) -> Self {
        Self {
            client,
            model: resolve_model(model),
        }
    }

    fn to_chat_request(&self, request: &ProviderRequest) -> ChatRequest {
        let system = request
            .system
            .as_deref()
            .map(|s| ChatMessage::new("system", s));
        let messages = system
            .into_iter()
            .chain(
                request
                    .messages
                    .iter()
                    .map(|m| ChatMessage::new(m.role.to_string(), m.content.clone())),
            )
            .collect();

        ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResult, ProviderFailure> {
        let api_request = self.to_chat_request(request);
        debug!(
            model = %api_request.model,
            messages = api_request.messages.len(),
            "sending OpenAI request"
        );

        let response = self.client.complete_chat(&api_request).await?;
        let text = response.text();
        let usage = match response.usage {
            Some(u) => TokenUsage::reported(u.prompt_tokens, u.completion_tokens),
            None => TokenUsage::estimate(request, &text),
        };

        Ok(ProviderResult {
            finish_reason: response.finish_reason(),
            text,
            usage,
            model: response.model,
        })
    }
}
