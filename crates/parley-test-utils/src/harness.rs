// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session testing.
//!
//! `TestHarness` assembles a [`SessionOrchestrator`] with mock providers,
//! a recording sleeper and no jitter, so retries are instantaneous and
//! every backoff delay can be asserted.

use std::sync::Arc;
use std::time::Duration;

use parley_agent::{Outcome, ProviderRegistry, SessionOrchestrator};
use parley_config::ParleyConfig;
use parley_config::model::ModelRateConfig;
use parley_context::ContextEngine;
use parley_core::{ParleyError, ProviderKind};
use parley_cost::CostLedger;
use parley_resilience::{Dispatcher, RetryPolicy};
use secrecy::SecretString;

use crate::mock_provider::MockProvider;
use crate::timing::{FixedJitter, RecordingSleeper};

/// A default configuration with both API keys set to dummy values.
pub fn test_config() -> ParleyConfig {
    let mut config = ParleyConfig::default();
    config.openai.api_key = Some(SecretString::from("sk-test".to_string()));
    config.anthropic.api_key = Some(SecretString::from("sk-ant-test".to_string()));
    config
}

/// Builder for creating test sessions with configurable options.
pub struct TestHarnessBuilder {
    config: ParleyConfig,
    active: ProviderKind,
    with_anthropic: bool,
    openai: MockProvider,
    anthropic: MockProvider,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: test_config(),
            active: ProviderKind::OpenAi,
            with_anthropic: true,
            openai: MockProvider::openai(),
            anthropic: MockProvider::anthropic(),
        }
    }

    /// Set warning and limit thresholds in USD.
    pub fn with_thresholds(mut self, warning_usd: f64, limit_usd: f64) -> Self {
        self.config.cost.warning_threshold_usd = warning_usd;
        self.config.cost.limit_threshold_usd = limit_usd;
        self
    }

    /// Register or override the price of `model` in USD per million tokens.
    pub fn with_pricing(mut self, model: &str, input_per_mtok: f64, output_per_mtok: f64) -> Self {
        self.config.cost.pricing.insert(
            model.to_string(),
            ModelRateConfig {
                input_per_mtok,
                output_per_mtok,
            },
        );
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.retry.max_attempts = max_attempts;
        self
    }

    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.config.context.max_turns = max_turns;
        self
    }

    pub fn with_system_prompt(mut self, prompt: Option<&str>) -> Self {
        self.config.provider.system_prompt = prompt.map(str::to_string);
        self
    }

    /// Start the session on `kind` instead of OpenAI.
    pub fn with_active(mut self, kind: ProviderKind) -> Self {
        self.active = kind;
        self
    }

    /// Register only the OpenAI mock.
    pub fn without_anthropic(mut self) -> Self {
        self.with_anthropic = false;
        self
    }

    /// Replace the OpenAI mock (e.g. with a pre-scripted one).
    pub fn with_openai(mut self, mock: MockProvider) -> Self {
        self.openai = mock;
        self
    }

    pub fn with_anthropic(mut self, mock: MockProvider) -> Self {
        self.anthropic = mock;
        self
    }

    /// Build the harness, or the error session construction returned.
    pub fn build(self) -> Result<TestHarness, ParleyError> {
        let openai = Arc::new(self.openai);
        let anthropic = Arc::new(self.anthropic);
        let sleeper = Arc::new(RecordingSleeper::new());

        let mut registry = ProviderRegistry::new();
        registry.register(openai.clone());
        if self.with_anthropic {
            registry.register(anthropic.clone());
        }

        let policy = RetryPolicy::from_config(&self.config.retry);
        let dispatcher =
            Dispatcher::with_parts(policy, sleeper.clone(), Arc::new(FixedJitter::none()));

        let session = SessionOrchestrator::new(
            registry,
            self.active,
            ContextEngine::from_config(&self.config),
            CostLedger::from_config(&self.config.cost),
            dispatcher,
        )?;

        Ok(TestHarness {
            session,
            openai,
            anthropic,
            sleeper,
            config: self.config,
        })
    }
}

/// A session wired to mock providers, with handles for assertions.
pub struct TestHarness {
    pub session: SessionOrchestrator,
    pub openai: Arc<MockProvider>,
    /// Present in the handle even when not registered with the session.
    pub anthropic: Arc<MockProvider>,
    pub sleeper: Arc<RecordingSleeper>,
    pub config: ParleyConfig,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send a message through the session.
    pub async fn send(&mut self, text: &str) -> Outcome {
        self.session.handle_user_message(text).await
    }

    /// Backoff delays the dispatcher asked for so far.
    pub fn delays(&self) -> Vec<Duration> {
        self.sleeper.delays()
    }
}
