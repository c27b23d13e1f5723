// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM vendor integrations (OpenAI, Anthropic).

use async_trait::async_trait;

use crate::error::ProviderFailure;
use crate::types::{ProviderKind, ProviderRequest, ProviderResult};

/// Adapter for a single LLM vendor.
///
/// An adapter translates a [`ProviderRequest`] into its vendor's wire shape,
/// issues exactly one HTTP request per call, and translates the response back
/// into a [`ProviderResult`]. Failures are classified, never retried here.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + 'static {
    /// Which vendor family this adapter speaks to.
    fn kind(&self) -> ProviderKind;

    /// The resolved model id requests are sent with (used for pricing).
    fn model(&self) -> &str;

    /// Sends one completion request.
    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResult, ProviderFailure>;
}
