// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The resilient dispatcher: the single retry authority for provider calls.
//!
//! A call moves through an explicit state machine:
//!
//! ```text
//! Attempting(n) --ok--------------------------------> Succeeded
//!               --AuthFailed | InvalidRequest-------> FailedFatal
//!               --retryable, n == max_attempts------> FailedExhausted
//!               --retryable, n <  max_attempts------> Backoff(n) --sleep--> Attempting(n+1)
//! ```
//!
//! The loop runs at most `max_attempts` attempts. There is no cancellation
//! of a call already in flight; dropping the future abandons it.

use std::sync::Arc;
use std::time::Duration;

use parley_core::{ParleyError, ProviderAdapter, ProviderFailure, ProviderRequest, ProviderResult};
use tracing::{debug, info, warn};

use crate::policy::{Jitter, RandJitter, RetryPolicy};
use crate::sleeper::{Sleeper, TokioSleeper};

/// States of one dispatch.
#[derive(Debug)]
enum DispatchState {
    Attempting {
        attempt: u32,
    },
    Backoff {
        attempt: u32,
        delay: Duration,
        cause: ProviderFailure,
    },
    Succeeded(ProviderResult),
    FailedFatal(ProviderFailure),
    FailedExhausted {
        attempts: u32,
        last: ProviderFailure,
    },
}

/// Wraps provider calls with classification-driven retry and backoff.
#[derive(Clone)]
pub struct Dispatcher {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    jitter: Arc<dyn Jitter>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// A dispatcher that sleeps on the tokio timer with random jitter.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_parts(policy, Arc::new(TokioSleeper), Arc::new(RandJitter))
    }

    /// A dispatcher with injected timing sources.
    pub fn with_parts(
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
        jitter: Arc<dyn Jitter>,
    ) -> Self {
        Self {
            policy,
            sleeper,
            jitter,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `request` through `adapter`, retrying per policy.
    ///
    /// Returns the first success, `ParleyError::Provider` for a
    /// non-retryable failure, or `ParleyError::RetryExhausted` carrying the
    /// last cause once every attempt has failed.
    pub async fn dispatch(
        &self,
        adapter: &dyn ProviderAdapter,
        request: &ProviderRequest,
    ) -> Result<ProviderResult, ParleyError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut state = DispatchState::Attempting { attempt: 1 };

        loop {
            state = match state {
                DispatchState::Attempting { attempt } => {
                    debug!(
                        provider = %adapter.kind(),
                        model = adapter.model(),
                        attempt,
                        max_attempts,
                        "dispatching provider request"
                    );
                    match adapter.send(request).await {
                        Ok(result) => DispatchState::Succeeded(result),
                        Err(failure) if !failure.is_retryable() => {
                            DispatchState::FailedFatal(failure)
                        }
                        Err(failure) if attempt >= max_attempts => {
                            DispatchState::FailedExhausted {
                                attempts: attempt,
                                last: failure,
                            }
                        }
                        Err(failure) => {
                            let delay = self.policy.backoff(
                                attempt,
                                self.jitter.as_ref(),
                                failure.retry_after,
                            );
                            DispatchState::Backoff {
                                attempt,
                                delay,
                                cause: failure,
                            }
                        }
                    }
                }
                DispatchState::Backoff {
                    attempt,
                    delay,
                    cause,
                } => {
                    warn!(
                        provider = %adapter.kind(),
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        kind = %cause.kind,
                        error = %cause.message,
                        "provider call failed, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                    DispatchState::Attempting {
                        attempt: attempt + 1,
                    }
                }
                DispatchState::Succeeded(result) => {
                    info!(
                        provider = %adapter.kind(),
                        model = %result.model,
                        input_tokens = result.usage.input_tokens,
                        output_tokens = result.usage.output_tokens,
                        estimated = result.usage.estimated,
                        "provider call succeeded"
                    );
                    return Ok(result);
                }
                DispatchState::FailedFatal(failure) => {
                    warn!(
                        provider = %adapter.kind(),
                        kind = %failure.kind,
                        error = %failure.message,
                        "provider call failed, not retrying"
                    );
                    return Err(ParleyError::Provider(failure));
                }
                DispatchState::FailedExhausted { attempts, last } => {
                    warn!(
                        provider = %adapter.kind(),
                        attempts,
                        kind = %last.kind,
                        error = %last.message,
                        "provider call failed, retries exhausted"
                    );
                    return Err(ParleyError::RetryExhausted { attempts, last });
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use parley_core::{FailureKind, ProviderKind, TokenUsage};

    use super::*;

    struct Scripted {
        script: Mutex<VecDeque<Result<ProviderResult, ProviderFailure>>>,
        calls: Mutex<u32>,
    }

    impl Scripted {
        fn new(script: Vec<Result<ProviderResult, ProviderFailure>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ProviderAdapter for Scripted {
        fn kind(&self) -> ProviderKind {
            ProviderKind::OpenAi
        }

        fn model(&self) -> &str {
            "gpt-4o-mini"
        }

        async fn send(&self, _request: &ProviderRequest) -> Result<ProviderResult, ProviderFailure> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderFailure::new(FailureKind::Unknown, "script empty")))
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Duration>>);

    #[async_trait]
    impl Sleeper for Recorder {
        async fn sleep(&self, delay: Duration) {
            self.0.lock().unwrap().push(delay);
        }
    }

    struct NoJitter;

    impl Jitter for NoJitter {
        fn factor(&self, _fraction: f64) -> f64 {
            1.0
        }
    }

    fn ok(text: &str) -> Result<ProviderResult, ProviderFailure> {
        Ok(ProviderResult {
            text: text.into(),
            usage: TokenUsage::reported(5, 5),
            model: "gpt-4o-mini".into(),
            finish_reason: Some("stop".into()),
        })
    }

    fn fail(kind: FailureKind) -> Result<ProviderResult, ProviderFailure> {
        Err(ProviderFailure::new(kind, format!("{kind} failure")))
    }

    fn request() -> ProviderRequest {
        ProviderRequest {
            system: None,
            messages: vec![],
            temperature: 0.7,
            max_tokens: 10,
        }
    }

    fn dispatcher(max_attempts: u32, sleeper: Arc<Recorder>) -> Dispatcher {
        let policy = RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            jitter_fraction: 0.0,
        };
        Dispatcher::with_parts(policy, sleeper, Arc::new(NoJitter))
    }

    #[tokio::test]
    async fn single_attempt_success_never_sleeps() {
        let sleeper = Arc::new(Recorder::default());
        let adapter = Scripted::new(vec![ok("hi")]);
        let result = dispatcher(3, sleeper.clone())
            .dispatch(&adapter, &request())
            .await
            .unwrap();
        assert_eq!(result.text, "hi");
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_request_is_fatal() {
        let sleeper = Arc::new(Recorder::default());
        let adapter = Scripted::new(vec![fail(FailureKind::InvalidRequest), ok("unused")]);
        let err = dispatcher(5, sleeper.clone())
            .dispatch(&adapter, &request())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ParleyError::Provider(ProviderFailure {
                kind: FailureKind::InvalidRequest,
                ..
            })
        ));
        assert_eq!(adapter.calls(), 1);
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn exhaustion_carries_last_cause() {
        let sleeper = Arc::new(Recorder::default());
        let adapter = Scripted::new(vec![
            fail(FailureKind::Transient),
            fail(FailureKind::RateLimited),
        ]);
        let err = dispatcher(2, sleeper.clone())
            .dispatch(&adapter, &request())
            .await
            .unwrap_err();
        match err {
            ParleyError::RetryExhausted { attempts, last } => {
                assert_eq!(attempts, 2);
                assert_eq!(last.kind, FailureKind::RateLimited);
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
        assert_eq!(sleeper.0.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn single_attempt_policy_exhausts_immediately() {
        let sleeper = Arc::new(Recorder::default());
        let adapter = Scripted::new(vec![fail(FailureKind::Unknown)]);
        let err = dispatcher(1, sleeper.clone())
            .dispatch(&adapter, &request())
            .await
            .unwrap_err();
        assert!(matches!(err, ParleyError::RetryExhausted { attempts: 1, .. }));
        assert!(sleeper.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delays_double_between_attempts() {
        let sleeper = Arc::new(Recorder::default());
        let adapter = Scripted::new(vec![
            fail(FailureKind::Transient),
            fail(FailureKind::Transient),
            fail(FailureKind::Transient),
            ok("finally"),
        ]);
        dispatcher(4, sleeper.clone())
            .dispatch(&adapter, &request())
            .await
            .unwrap();
        assert_eq!(
            *sleeper.0.lock().unwrap(),
            vec![
                Duration::from_millis(100),
                Duration::from_millis(200),
                Duration::from_millis(400)
            ]
        );
    }
}
