// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./parley.toml` > `~/.config/parley/parley.toml` > `/etc/parley/parley.toml`
//! with two environment layers on top: the conventional flat names
//! (`OPENAI_API_KEY`, `TEMPERATURE`, ...) and `PARLEY_<SECTION>_<KEY>` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ParleyConfig;

/// Flat environment names and the config key each one feeds.
const FLAT_ENV_KEYS: &[(&str, &str)] = &[
    ("DEFAULT_PROVIDER", "provider.default"),
    ("TEMPERATURE", "provider.temperature"),
    ("MAX_TOKENS", "provider.max_tokens"),
    ("SYSTEM_PROMPT", "provider.system_prompt"),
    ("OPENAI_API_KEY", "openai.api_key"),
    ("ANTHROPIC_API_KEY", "anthropic.api_key"),
    ("COST_WARNING_THRESHOLD", "cost.warning_threshold_usd"),
    ("COST_LIMIT_THRESHOLD", "cost.limit_threshold_usd"),
    ("LOG_LEVEL", "log.level"),
];

/// Sections addressable through `PARLEY_<SECTION>_<KEY>`.
const SECTIONS: &[&str] = &[
    "provider",
    "openai",
    "anthropic",
    "cost",
    "retry",
    "context",
    "log",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/parley/parley.toml` (system-wide)
/// 3. `~/.config/parley/parley.toml` (user XDG config)
/// 4. `./parley.toml` (local directory)
/// 5. Flat environment names (`OPENAI_API_KEY`, `COST_LIMIT_THRESHOLD`, ...)
/// 6. `PARLEY_*` environment variables
pub fn load_config() -> Result<ParleyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no environment).
pub fn load_config_from_str(toml_content: &str) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ParleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file(path))
        .merge(flat_env_provider())
        .merge(prefixed_env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ParleyConfig::default()))
        .merge(Toml::file("/etc/parley/parley.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("parley/parley.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("parley.toml"))
        .merge(flat_env_provider())
        .merge(prefixed_env_provider())
}

/// Map the conventional unprefixed variable names onto config keys.
fn flat_env_provider() -> Env {
    let names: Vec<&str> = FLAT_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        FLAT_ENV_KEYS
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, target)| (*target).to_string())
            .unwrap_or_else(|| key.as_str().to_string())
            .into()
    })
}

/// `PARLEY_<SECTION>_<KEY>` overrides.
///
/// Uses an explicit section map instead of `Env::split("_")` because keys
/// contain underscores: `PARLEY_COST_LIMIT_THRESHOLD_USD` must become
/// `cost.limit_threshold_usd`, not `cost.limit.threshold.usd`.
fn prefixed_env_provider() -> Env {
    Env::prefixed("PARLEY_").map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = SECTIONS
            .iter()
            .find_map(|section| {
                key_str
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or(key_str);
        mapped.into()
    })
}
