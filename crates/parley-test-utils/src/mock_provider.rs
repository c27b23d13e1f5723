// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with a pre-configured script of
//! outcomes, enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use parley_core::{
    FailureKind, ProviderAdapter, ProviderFailure, ProviderKind, ProviderRequest, ProviderResult,
    TokenUsage,
};

/// Build a successful result with reported usage.
pub fn reply(text: &str, input_tokens: u32, output_tokens: u32) -> ProviderResult {
    ProviderResult {
        text: text.to_string(),
        usage: TokenUsage::reported(input_tokens, output_tokens),
        model: "mock-model".to_string(),
        finish_reason: Some("stop".to_string()),
    }
}

/// A mock provider that plays back a scripted sequence of outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a default
/// "mock response" with 10 input and 20 output tokens is returned. Every
/// request is recorded for later assertions.
pub struct MockProvider {
    kind: ProviderKind,
    model: String,
    script: Mutex<VecDeque<Result<ProviderResult, ProviderFailure>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    /// Create a mock for `kind` that reports `model` as its resolved model.
    pub fn new(kind: ProviderKind, model: &str) -> Self {
        Self {
            kind,
            model: model.to_string(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// An OpenAI-kind mock priced as `gpt-4o-mini`.
    pub fn openai() -> Self {
        Self::new(ProviderKind::OpenAi, "gpt-4o-mini")
    }

    /// An Anthropic-kind mock priced as `claude-3-5-haiku-20241022`.
    pub fn anthropic() -> Self {
        Self::new(ProviderKind::Anthropic, "claude-3-5-haiku-20241022")
    }

    /// Create a mock pre-loaded with outcomes.
    pub fn with_script(
        kind: ProviderKind,
        model: &str,
        script: Vec<Result<ProviderResult, ProviderFailure>>,
    ) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(script)),
            ..Self::new(kind, model)
        }
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, text: &str, input_tokens: u32, output_tokens: u32) {
        self.push(Ok(reply(text, input_tokens, output_tokens))).await;
    }

    /// Queue a failure of the given kind.
    pub async fn push_failure(&self, kind: FailureKind, message: &str) {
        self.push(Err(ProviderFailure::new(kind, message))).await;
    }

    /// Queue an arbitrary outcome.
    pub async fn push(&self, outcome: Result<ProviderResult, ProviderFailure>) {
        self.script.lock().await.push_back(outcome);
    }

    /// Every request received so far, in order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `send` calls so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Outcomes not yet consumed.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, request: &ProviderRequest) -> Result<ProviderResult, ProviderFailure> {
        self.requests.lock().await.push(request.clone());
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(reply("mock response", 10, 20)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            system: None,
            messages: vec![],
            temperature: 0.7,
            max_tokens: 100,
        }
    }

    #[tokio::test]
    async fn default_response_when_queue_empty() {
        let provider = MockProvider::openai();
        let resp = provider.send(&request()).await.unwrap();
        assert_eq!(resp.text, "mock response");
        assert_eq!(resp.usage, TokenUsage::reported(10, 20));
    }

    #[tokio::test]
    async fn scripted_outcomes_returned_in_order() {
        let provider = MockProvider::with_script(
            ProviderKind::Anthropic,
            "claude-3-5-haiku-20241022",
            vec![
                Err(ProviderFailure::new(FailureKind::Transient, "reset")),
                Ok(reply("second", 1, 1)),
            ],
        );

        let first = provider.send(&request()).await.unwrap_err();
        assert_eq!(first.kind, FailureKind::Transient);
        assert_eq!(provider.send(&request()).await.unwrap().text, "second");
        assert_eq!(provider.send(&request()).await.unwrap().text, "mock response");
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockProvider::openai();
        provider.push_reply("ok", 1, 1).await;
        let mut req = request();
        req.system = Some("sys".into());
        provider.send(&req).await.unwrap();

        let seen = provider.requests().await;
        assert_eq!(seen, vec![req]);
        assert_eq!(provider.remaining().await, 0);
    }
}
