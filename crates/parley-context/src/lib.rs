// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation history and prompt assembly for Parley.
//!
//! - **Conversation store**: ordered turn history with a bounded context window
//! - **Context engine**: turns the window plus the system prompt and request
//!   parameters into a [`ProviderRequest`]
//!
//! The system prompt is held by the engine, not the store, so clearing the
//! conversation never drops it.

pub mod store;

use parley_config::ParleyConfig;
use parley_core::{ProviderRequest, RequestMessage};
use tracing::debug;

pub use store::{ContextWindow, ConversationStore};

/// Builds provider requests from the conversation store.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEngine {
    system_prompt: Option<String>,
    max_turns: Option<usize>,
    temperature: f64,
    max_tokens: u32,
}

impl ContextEngine {
    pub fn new(
        system_prompt: Option<String>,
        max_turns: Option<usize>,
        temperature: f64,
        max_tokens: u32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.filter(|s| !s.trim().is_empty()),
            max_turns,
            temperature,
            max_tokens,
        }
    }

    pub fn from_config(config: &ParleyConfig) -> Self {
        Self::new(
            config.provider.system_prompt.clone(),
            config.context.max_turns,
            config.provider.temperature,
            config.provider.max_tokens,
        )
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// Assemble the next request from the most recent turns.
    pub fn assemble(&self, store: &ConversationStore) -> ProviderRequest {
        let messages: Vec<RequestMessage> = store
            .context(self.max_turns)
            .map(RequestMessage::from)
            .collect();

        debug!(
            history_len = store.len(),
            window_len = messages.len(),
            "assembled context window"
        );

        ProviderRequest {
            system: self.system_prompt.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
