// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The set of provider adapters a session may switch between.

use std::collections::HashMap;
use std::sync::Arc;

use parley_anthropic::AnthropicProvider;
use parley_config::ParleyConfig;
use parley_core::{ParleyError, ProviderAdapter, ProviderKind};
use parley_openai::OpenAiProvider;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// Adapters keyed by vendor family. At most one adapter per kind.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an adapter for every provider whose API key is configured.
    pub fn from_config(config: &ParleyConfig) -> Result<Self, ParleyError> {
        let mut registry = Self::new();

        if config.openai.api_key.is_some() {
            registry.register(Arc::new(OpenAiProvider::new(&config.openai)?));
        } else {
            debug!("no OpenAI API key configured, skipping adapter");
        }

        if config.anthropic.api_key.is_some() {
            registry.register(Arc::new(AnthropicProvider::new(&config.anthropic)?));
        } else {
            debug!("no Anthropic API key configured, skipping adapter");
        }

        info!(providers = ?registry.kinds(), "provider registry built");
        Ok(registry)
    }

    /// Add an adapter, returning the one it replaced for the same kind.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.insert(adapter.kind(), adapter)
    }

    pub fn get(&self, kind: ProviderKind) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind)
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.adapters.contains_key(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::iter().filter(|k| self.contains(*k)).collect()
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn ProviderAdapter>> {
        self.adapters.values()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
