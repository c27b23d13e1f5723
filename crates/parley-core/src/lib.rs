// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Parley.
//!
//! This crate provides the shared types, the provider adapter trait, and the
//! error taxonomy used throughout the workspace. Both vendor adapters
//! implement [`ProviderAdapter`] defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FailureKind, ParleyError, ProviderFailure, parse_retry_after};
pub use traits::ProviderAdapter;
pub use types::{
    ProviderKind, ProviderRequest, ProviderResult, RequestMessage, Role, TokenUsage, Turn,
    resolve_model,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parley_error_has_all_variants() {
        let _config = ParleyError::Config("test".into());
        let _empty = ParleyError::EmptyMessage;
        let _unknown = ParleyError::UnknownModel {
            model: "test".into(),
        };
        let _unavailable = ParleyError::ProviderUnavailable {
            provider: "openai".into(),
        };
        let _provider = ParleyError::from(ProviderFailure::new(FailureKind::AuthFailed, "bad key"));
        let _exhausted = ParleyError::RetryExhausted {
            attempts: 3,
            last: ProviderFailure::new(FailureKind::Transient, "timeout"),
        };
        let _internal = ParleyError::Internal("test".into());
    }

    #[test]
    fn exactly_two_provider_kinds() {
        let kinds: Vec<_> = ProviderKind::iter().collect();
        assert_eq!(kinds, vec![ProviderKind::OpenAi, ProviderKind::Anthropic]);
    }

    #[test]
    fn provider_adapter_is_object_safe() {
        fn _assert_dyn(_: &dyn ProviderAdapter) {}
    }
}
