// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Parley.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;
use std::str::FromStr;

use parley_core::ProviderKind;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level Parley configuration.
///
/// Built once at startup and passed by reference; nothing below the binary
/// reads the environment directly.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Active provider and request parameters.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Spend thresholds and pricing overrides.
    #[serde(default)]
    pub cost: CostConfig,

    /// Retry/backoff policy for provider calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Context window sent with each request.
    #[serde(default)]
    pub context: ContextConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl ParleyConfig {
    /// Returns the API key configured for `kind`, if any.
    pub fn api_key(&self, kind: ProviderKind) -> Option<&SecretString> {
        match kind {
            ProviderKind::OpenAi => self.openai.api_key.as_ref(),
            ProviderKind::Anthropic => self.anthropic.api_key.as_ref(),
        }
    }
}

/// Active provider and default request parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Provider used at session start (`openai` or `anthropic`).
    #[serde(
        default = "default_provider",
        deserialize_with = "deserialize_provider_kind"
    )]
    pub default: ProviderKind,

    /// Sampling temperature, 0.0 to 2.0.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System prompt sent with every request. Survives `/clear`.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            default: default_provider(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

fn default_provider() -> ProviderKind {
    ProviderKind::OpenAi
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_system_prompt() -> Option<String> {
    Some("You are a helpful AI assistant. Be concise and friendly.".to_string())
}

/// Accepts any casing (`OpenAI`, `openai`, `ANTHROPIC`).
fn deserialize_provider_kind<'de, D>(deserializer: D) -> Result<ProviderKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    ProviderKind::from_str(raw.trim()).map_err(|_| {
        serde::de::Error::invalid_value(
            serde::de::Unexpected::Str(&raw),
            &"one of `openai`, `anthropic`",
        )
    })
}

/// OpenAI API configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Bearer credential. `None` leaves the provider unavailable.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Model alias; `default` resolves to the adapter's default model.
    #[serde(default = "default_model_alias")]
    pub model: String,

    /// Chat-completions endpoint.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model_alias(),
            base_url: default_openai_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Anthropic API configuration.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key sent as `x-api-key`. `None` leaves the provider unavailable.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Model alias; `default` resolves to the adapter's default model.
    #[serde(default = "default_model_alias")]
    pub model: String,

    /// Messages endpoint.
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model_alias(),
            base_url: default_anthropic_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model_alias() -> String {
    "default".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Spend thresholds and pricing overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostConfig {
    /// Running total at which a warning is reported.
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_usd: f64,

    /// Running total at which new requests are blocked.
    #[serde(default = "default_limit_threshold")]
    pub limit_threshold_usd: f64,

    /// Extra or replacement per-model rates, keyed by model id.
    #[serde(default)]
    pub pricing: BTreeMap<String, ModelRateConfig>,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            warning_threshold_usd: default_warning_threshold(),
            limit_threshold_usd: default_limit_threshold(),
            pricing: BTreeMap::new(),
        }
    }
}

fn default_warning_threshold() -> f64 {
    0.10
}

fn default_limit_threshold() -> f64 {
    1.00
}

/// Per-model rates in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelRateConfig {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

/// Retry/backoff policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further retry.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Upper bound on a single backoff delay.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Symmetric jitter, 0.0 to 1.0 (0.2 means +/-20%).
    #[serde(default = "default_jitter_fraction")]
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_fraction: default_jitter_fraction(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_jitter_fraction() -> f64 {
    0.2
}

/// Context window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Most recent turns sent with each request. `None` sends everything.
    #[serde(default = "default_max_turns")]
    pub max_turns: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

fn default_max_turns() -> Option<usize> {
    Some(40)
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error; `warning` and
    /// `critical` are accepted as aliases).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LogConfig {
    /// The level as a `tracing` filter directive, or `None` if unrecognized.
    pub fn filter_directive(&self) -> Option<&'static str> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some("trace"),
            "debug" => Some("debug"),
            "info" => Some("info"),
            "warn" | "warning" => Some("warn"),
            "error" | "critical" => Some("error"),
            _ => None,
        }
    }
}
