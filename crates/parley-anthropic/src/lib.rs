// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude provider adapter for Parley.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use parley_config::model::AnthropicConfig;
use parley_core::{
    ParleyError, ProviderAdapter, ProviderFailure, ProviderKind, ProviderRequest, ProviderResult,
    Role, TokenUsage,
};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Model used when the configured model is the `default` alias.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Map a configured model name to the id sent on the wire.
pub fn resolve_model(alias: &str) -> String {
    parley_core::resolve_model(alias, DEFAULT_MODEL)
}

/// Anthropic Claude provider implementing [`ProviderAdapter`].
pub struct AnthropicProvider {
    client: AnthropicClient,
    model: String,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from the given configuration.
    ///
    /// Fails with `ProviderUnavailable` when no API key is configured.
    pub fn new(config: &AnthropicConfig) -> Result<Self, ParleyError> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| ParleyError::ProviderUnavailable {
                provider: ProviderKind::Anthropic.to_string(),
            })?;

        let client = AnthropicClient::new(
            api_key,
            &config.api_version,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        let model = resolve_model(&config.model);

        info!(model = %model, "Anthropic provider initialized");

        Ok(Self { client, model })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: AnthropicClient, model: &str) -> Self {
        Self {
            client,
            model: resolve_model(model),
        }
    }

    /// Converts a [`ProviderRequest`] to an Anthropic [`MessageRequest`].
    ///
    /// The Messages API requires the first message to come from the user, so
    /// any assistant turns at the head of a truncated window are dropped.
    fn to_message_request(&self, request: &ProviderRequest) -> MessageRequest {
        let messages: Vec<ApiMessage> = request
            .messages
            .iter()
            .skip_while(|m| m.role == Role::Assistant)
            .map(|m| ApiMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        MessageRequest {
            model: self.model.clone(),
            messages,
            system: request.system.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResult, ProviderFailure> {
        let api_request = self.to_message_request(request);
        debug!(
            model = %api_request.model,
            messages = api_request.messages.len(),
            "sending Anthropic request"
        );

        let response = self.client.complete_message(&api_request).await?;
        let text = response.text();
        let usage = match response.usage {
            Some(u) => TokenUsage::reported(u.input_tokens, u.output_tokens),
            None => TokenUsage::estimate(request, &text),
        };

        Ok(ProviderResult {
            text,
            usage,
            model: response.model,
            finish_reason: response.stop_reason,
        })
    }
}
