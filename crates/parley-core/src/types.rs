// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the conversation store, provider adapters,
//! dispatcher, and session orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The vendor families Parley can talk to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One immutable entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            input_tokens: None,
            output_tokens: None,
            created_at: Utc::now(),
        }
    }

    /// An assistant reply annotated with the usage of the call that produced it.
    pub fn assistant(content: impl Into<String>, usage: &TokenUsage) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            input_tokens: Some(usage.input_tokens),
            output_tokens: Some(usage.output_tokens),
            created_at: Utc::now(),
        }
    }
}

/// The role/content projection of a [`Turn`] sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for RequestMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// A vendor-neutral completion request.
///
/// `temperature` and `max_tokens` are validated at configuration time;
/// adapters pass them through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// System prompt. Not part of the conversation history.
    pub system: Option<String>,
    pub messages: Vec<RequestMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl ProviderRequest {
    /// Total characters of prompt text, for usage estimation.
    pub fn prompt_text_len(&self) -> usize {
        self.system.as_deref().map_or(0, |s| s.chars().count())
            + self
                .messages
                .iter()
                .map(|m| m.content.chars().count())
                .sum::<usize>()
    }
}

/// Token usage for one provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// True when the vendor did not report usage and counts were estimated.
    pub estimated: bool,
}

impl TokenUsage {
    pub fn reported(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            estimated: false,
        }
    }

    /// Estimate usage from request and reply text when the vendor omits it.
    pub fn estimate(request: &ProviderRequest, reply: &str) -> Self {
        Self {
            input_tokens: estimate_tokens_from_len(request.prompt_text_len()),
            output_tokens: estimate_tokens(reply),
            estimated: true,
        }
    }
}

/// Deterministic token estimate: one token per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u32 {
    estimate_tokens_from_len(text.chars().count())
}

fn estimate_tokens_from_len(chars: usize) -> u32 {
    u32::try_from(chars.div_ceil(4)).unwrap_or(u32::MAX)
}

/// Map a configured model name to the id sent on the wire: the `default`
/// alias (or an empty name) selects `default_model`, anything else is used
/// verbatim.
pub fn resolve_model(alias: &str, default_model: &str) -> String {
    let alias = alias.trim();
    if alias.is_empty() || alias.eq_ignore_ascii_case("default") {
        default_model.to_string()
    } else {
        alias.to_string()
    }
}

/// The uniform result of a successful provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResult {
    pub text: String,
    pub usage: TokenUsage,
    /// Model id as echoed by the vendor.
    pub model: String,
    pub finish_reason: Option<String>,
}
