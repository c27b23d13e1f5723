// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Parley.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and miette
//! diagnostic rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use parley_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Provider: {}", config.provider.default);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ParleyConfig;
pub use validation::{api_key_env_var, config_warnings};

use parley_core::ProviderKind;

/// Load configuration from the XDG hierarchy and environment, then validate it.
///
/// Returns either a valid `ParleyConfig` or every diagnostic found.
pub fn load_and_validate() -> Result<ParleyConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Like [`load_and_validate`], with the starting provider overridden before
/// validation (the `--provider` flag).
pub fn load_and_validate_for(
    provider: Option<ProviderKind>,
) -> Result<ParleyConfig, Vec<ConfigError>> {
    finish(loader::load_config().map(|mut config| {
        if let Some(kind) = provider {
            config.provider.default = kind;
        }
        config
    }))
}

/// Load configuration from a TOML string (no files, no environment) and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ParleyConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<ParleyConfig, figment::Error>,
) -> Result<ParleyConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
