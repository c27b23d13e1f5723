// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as numeric ranges, threshold ordering, and credential presence.

use parley_core::ProviderKind;

use crate::diagnostic::ConfigError;
use crate::model::ParleyConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ParleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let provider = &config.provider;
    if !(0.0..=2.0).contains(&provider.temperature) {
        errors.push(ConfigError::validation(format!(
            "provider.temperature must be between 0.0 and 2.0, got {}",
            provider.temperature
        )));
    }

    if provider.max_tokens == 0 {
        errors.push(ConfigError::validation(
            "provider.max_tokens must be greater than 0",
        ));
    }

    let cost = &config.cost;
    for (name, value) in [
        ("cost.warning_threshold_usd", cost.warning_threshold_usd),
        ("cost.limit_threshold_usd", cost.limit_threshold_usd),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::validation(format!(
                "{name} must be a non-negative number, got {value}"
            )));
        }
    }

    for (model, rate) in &cost.pricing {
        if model.trim().is_empty() {
            errors.push(ConfigError::validation(
                "cost.pricing keys must be non-empty model ids",
            ));
        }
        for (field, value) in [
            ("input_per_mtok", rate.input_per_mtok),
            ("output_per_mtok", rate.output_per_mtok),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::validation(format!(
                    "cost.pricing.{model}.{field} must be a non-negative number, got {value}"
                )));
            }
        }
    }

    let retry = &config.retry;
    if retry.max_attempts < 1 {
        errors.push(ConfigError::validation(
            "retry.max_attempts must be at least 1",
        ));
    }

    if !(0.0..=1.0).contains(&retry.jitter_fraction) {
        errors.push(ConfigError::validation(format!(
            "retry.jitter_fraction must be between 0.0 and 1.0, got {}",
            retry.jitter_fraction
        )));
    }

    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ConfigError::validation(format!(
            "retry.base_delay_ms ({}) must not exceed retry.max_delay_ms ({})",
            retry.base_delay_ms, retry.max_delay_ms
        )));
    }

    if config.context.max_turns == Some(0) {
        errors.push(ConfigError::validation(
            "context.max_turns must be at least 1 (omit it to send the full history)",
        ));
    }

    if config.log.filter_directive().is_none() {
        errors.push(ConfigError::validation(format!(
            "log.level `{}` is not one of trace, debug, info, warning, error, critical",
            config.log.level
        )));
    }

    for (name, timeout) in [
        ("openai.timeout_secs", config.openai.timeout_secs),
        ("anthropic.timeout_secs", config.anthropic.timeout_secs),
    ] {
        if timeout == 0 {
            errors.push(ConfigError::validation(format!(
                "{name} must be greater than 0"
            )));
        }
    }

    let active = provider.default;
    if config.api_key(active).is_none() {
        errors.push(ConfigError::MissingApiKey {
            provider: active.to_string(),
            env_var: api_key_env_var(active).to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The conventional environment variable holding a provider's credential.
pub fn api_key_env_var(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAi => "OPENAI_API_KEY",
        ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
    }
}

/// Settings that are accepted but probably not what the user meant.
///
/// Validation runs before logging is initialized, so these are returned for
/// the caller to report.
pub fn config_warnings(config: &ParleyConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let cost = &config.cost;
    if cost.warning_threshold_usd > cost.limit_threshold_usd {
        warnings.push(format!(
            "cost warning threshold (${:.2}) is above the limit (${:.2}); the limit will block first",
            cost.warning_threshold_usd, cost.limit_threshold_usd
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn valid_config() -> ParleyConfig {
        let mut config = ParleyConfig::default();
        config.openai.api_key = Some(SecretString::from("sk-test".to_string()));
        config
    }

    #[test]
    fn defaults_with_key_pass() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn missing_key_for_active_provider_fails() {
        let config = ParleyConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            &errors[0],
            ConfigError::MissingApiKey { env_var, .. } if env_var == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn missing_key_for_inactive_provider_is_fine() {
        let config = valid_config();
        assert!(config.anthropic.api_key.is_none());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = valid_config();
        config.provider.temperature = 2.5;
        config.provider.max_tokens = 0;
        config.cost.limit_threshold_usd = -1.0;
        config.retry.max_attempts = 0;
        config.log.level = "verbose".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn nan_threshold_rejected() {
        let mut config = valid_config();
        config.cost.warning_threshold_usd = f64::NAN;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_thresholds_are_allowed() {
        let mut config = valid_config();
        config.cost.warning_threshold_usd = 0.0;
        config.cost.limit_threshold_usd = 0.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn warning_above_limit_is_allowed() {
        let mut config = valid_config();
        config.cost.warning_threshold_usd = 5.0;
        config.cost.limit_threshold_usd = 1.0;
        assert!(validate_config(&config).is_ok());

        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("$5.00"), "{}", warnings[0]);
        assert!(warnings[0].contains("above the limit ($1.00)"), "{}", warnings[0]);
    }

    #[test]
    fn ordered_thresholds_have_no_warnings() {
        assert!(config_warnings(&valid_config()).is_empty());
    }

    #[test]
    fn base_delay_above_max_rejected() {
        let mut config = valid_config();
        config.retry.base_delay_ms = 10_000;
        config.retry.max_delay_ms = 1_000;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn log_level_aliases_accepted() {
        for level in ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL", "trace"] {
            let mut config = valid_config();
            config.log.level = level.into();
            assert!(validate_config(&config).is_ok(), "{level} should be accepted");
        }
    }
}
