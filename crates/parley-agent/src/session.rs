// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-session orchestration of a single conversation.
//!
//! The orchestrator integrates:
//! - **Conversation store**: user and assistant turns, in order
//! - **Cost ledger**: pre-call gate on incurred spend, post-call recording
//! - **Resilient dispatcher**: the only place provider calls are retried
//!
//! Threshold enforcement is eventual. The pre-call check only sees spend
//! already incurred, so the call that crosses the limit still completes and
//! its Block verdict is reported alongside the reply.

use std::sync::Arc;

use parley_config::ParleyConfig;
use parley_context::{ContextEngine, ConversationStore};
use parley_core::{ParleyError, ProviderAdapter, ProviderKind, Turn};
use parley_cost::{CostLedger, CostSummary, Verdict};
use parley_resilience::{Dispatcher, RetryPolicy};
use tracing::{debug, info, warn};

use crate::registry::ProviderRegistry;

/// Result of handling one user message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The provider answered. `notice` is the post-call threshold verdict.
    Replied {
        text: String,
        cost_usd: f64,
        notice: Verdict,
    },
    /// Spend already reached the limit; no provider was called.
    Blocked { reason: String },
    /// Validation or dispatch failed; no assistant turn was recorded.
    Failed { error: ParleyError },
}

impl Outcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Outcome::Blocked { .. })
    }

    /// True when the session should not continue: blocked before the call,
    /// or the reply pushed spend to the limit.
    pub fn limit_reached(&self) -> bool {
        match self {
            Outcome::Blocked { .. } => true,
            Outcome::Replied { notice, .. } => notice.is_block(),
            Outcome::Failed { .. } => false,
        }
    }
}

/// Composes the conversation store, cost ledger and dispatcher for one session.
pub struct SessionOrchestrator {
    providers: ProviderRegistry,
    active: ProviderKind,
    store: ConversationStore,
    ledger: CostLedger,
    context: ContextEngine,
    dispatcher: Dispatcher,
}

impl SessionOrchestrator {
    /// Assemble a session from its parts.
    ///
    /// Fails with `ProviderUnavailable` if `active` has no adapter, and with
    /// `UnknownModel` if any registered adapter's model is missing from the
    /// ledger's price table.
    pub fn new(
        providers: ProviderRegistry,
        active: ProviderKind,
        context: ContextEngine,
        ledger: CostLedger,
        dispatcher: Dispatcher,
    ) -> Result<Self, ParleyError> {
        if !providers.contains(active) {
            return Err(ParleyError::ProviderUnavailable {
                provider: active.to_string(),
            });
        }

        for adapter in providers.adapters() {
            if !ledger.prices().contains(adapter.model()) {
                return Err(ParleyError::UnknownModel {
                    model: adapter.model().to_string(),
                });
            }
        }

        info!(
            provider = %active,
            available = ?providers.kinds(),
            "session started"
        );

        Ok(Self {
            providers,
            active,
            store: ConversationStore::new(),
            ledger,
            context,
            dispatcher,
        })
    }

    /// Build a session from configuration, constructing real adapters.
    pub fn from_config(config: &ParleyConfig) -> Result<Self, ParleyError> {
        Self::new(
            ProviderRegistry::from_config(config)?,
            config.provider.default,
            ContextEngine::from_config(config),
            CostLedger::from_config(&config.cost),
            Dispatcher::new(RetryPolicy::from_config(&config.retry)),
        )
    }

    /// Handle one user message end to end.
    pub async fn handle_user_message(&mut self, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            return Outcome::Failed {
                error: ParleyError::EmptyMessage,
            };
        }

        self.store.append(Turn::user(text));

        if let Verdict::Block(reason) = self.ledger.verdict() {
            warn!(
                running_total = self.ledger.state().running_total_usd(),
                "message refused: cost limit already reached"
            );
            return Outcome::Blocked { reason };
        }

        let adapter = match self.active_adapter() {
            Ok(adapter) => adapter,
            Err(error) => return Outcome::Failed { error },
        };

        let request = self.context.assemble(&self.store);
        debug!(
            provider = %self.active,
            turns = request.messages.len(),
            "dispatching request"
        );

        let result = match self.dispatcher.dispatch(adapter.as_ref(), &request).await {
            Ok(result) => result,
            Err(error) => {
                warn!(provider = %self.active, error = %error, "request failed");
                return Outcome::Failed { error };
            }
        };

        let entry = match self.ledger.entry_for(adapter.model(), &result.usage) {
            Ok(entry) => entry,
            Err(error) => return Outcome::Failed { error },
        };
        let cost_usd = entry.cost_usd();

        self.store.append(Turn::assistant(result.text.clone(), &result.usage));
        self.ledger.record(entry);

        info!(
            provider = %self.active,
            model = adapter.model(),
            vendor_model = %result.model,
            input_tokens = result.usage.input_tokens,
            output_tokens = result.usage.output_tokens,
            estimated = result.usage.estimated,
            finish_reason = result.finish_reason.as_deref().unwrap_or("unknown"),
            cost_usd,
            "API call"
        );

        Outcome::Replied {
            text: result.text,
            cost_usd,
            notice: self.ledger.check(),
        }
    }

    /// Make `kind` the active provider. History and spend are untouched.
    pub fn switch_provider(&mut self, kind: ProviderKind) -> Result<(), ParleyError> {
        if !self.providers.contains(kind) {
            return Err(ParleyError::ProviderUnavailable {
                provider: kind.to_string(),
            });
        }
        if kind != self.active {
            info!(from = %self.active, to = %kind, "switched provider");
            self.active = kind;
        }
        Ok(())
    }

    fn active_adapter(&self) -> Result<Arc<dyn ProviderAdapter>, ParleyError> {
        self.providers
            .get(self.active)
            .cloned()
            .ok_or_else(|| ParleyError::ProviderUnavailable {
                provider: self.active.to_string(),
            })
    }

    pub fn active_provider(&self) -> ProviderKind {
        self.active
    }

    /// Resolved model id of the active adapter.
    pub fn active_model(&self) -> &str {
        self.providers
            .get(self.active)
            .map(|a| a.model())
            .unwrap_or("")
    }

    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.providers.kinds()
    }

    /// Discard the conversation history, returning the number of turns removed.
    /// The system prompt and spend are kept.
    pub fn clear_history(&mut self) -> usize {
        self.store.clear()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn ledger(&self) -> &CostLedger {
        &self.ledger
    }

    pub fn cost_summary(&self) -> CostSummary {
        self.ledger.summary()
    }

    pub fn context_engine(&self) -> &ContextEngine {
        &self.context
    }
}

impl std::fmt::Debug for SessionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOrchestrator")
            .field("active", &self.active)
            .field("providers", &self.providers)
            .field("turns", &self.store.len())
            .field("total", &self.ledger.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::load_config_from_str;

    #[test]
    fn outcome_limit_reached() {
        let blocked = Outcome::Blocked {
            reason: "limit".into(),
        };
        assert!(blocked.is_blocked());
        assert!(blocked.limit_reached());

        let replied = Outcome::Replied {
            text: "hi".into(),
            cost_usd: 1.0,
            notice: Verdict::Block("limit".into()),
        };
        assert!(!replied.is_blocked());
        assert!(replied.limit_reached());

        let failed = Outcome::Failed {
            error: ParleyError::EmptyMessage,
        };
        assert!(!failed.limit_reached());
    }

    #[test]
    fn from_config_requires_active_adapter() {
        let config = load_config_from_str(
            r#"
            [provider]
            default = "openai"

            [anthropic]
            api_key = "sk-ant-test"
            "#,
        )
        .unwrap();
        let err = SessionOrchestrator::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            ParleyError::ProviderUnavailable {
                provider: "openai".into()
            }
        );
    }

    #[test]
    fn from_config_rejects_unpriced_model() {
        let config = load_config_from_str(
            r#"
            [openai]
            api_key = "sk-test"
            model = "gpt-5-experimental"
            "#,
        )
        .unwrap();
        let err = SessionOrchestrator::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            ParleyError::UnknownModel {
                model: "gpt-5-experimental".into()
            }
        );
    }

    #[test]
    fn pricing_override_admits_custom_model() {
        let config = load_config_from_str(
            r#"
            [openai]
            api_key = "sk-test"
            model = "gpt-5-experimental"

            [cost.pricing.gpt-5-experimental]
            input_per_mtok = 1.0
            output_per_mtok = 2.0
            "#,
        )
        .unwrap();
        let session = SessionOrchestrator::from_config(&config).unwrap();
        assert_eq!(session.active_model(), "gpt-5-experimental");
        assert_eq!(session.active_provider(), ProviderKind::OpenAi);
    }
}
