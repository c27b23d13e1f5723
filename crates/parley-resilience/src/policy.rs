// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry policy and backoff delay calculation.

use std::time::Duration;

use parley_config::model::RetryConfig;
use rand::Rng;

/// Immutable retry/backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Symmetric jitter; 0.2 scales each delay by a factor in `[0.8, 1.2]`.
    pub jitter_fraction: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            jitter_fraction: config.jitter_fraction.clamp(0.0, 1.0),
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// `min(max_delay, base_delay * 2^(attempt-1))`, before jitter.
    ///
    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay to wait after `attempt` failed, scaled by `jitter`.
    ///
    /// A vendor `Retry-After` hint raises the delay but never beyond
    /// `max_delay`.
    pub fn backoff(
        &self,
        attempt: u32,
        jitter: &dyn Jitter,
        retry_after: Option<Duration>,
    ) -> Duration {
        let factor = jitter.factor(self.jitter_fraction);
        let delay = self.base_backoff(attempt).mul_f64(factor.max(0.0));
        match retry_after {
            Some(hint) => delay.max(hint.min(self.max_delay)),
            None => delay,
        }
    }
}

/// Source of the multiplicative jitter factor.
pub trait Jitter: Send + Sync {
    /// A factor in `[1 - fraction, 1 + fraction]`.
    fn factor(&self, fraction: f64) -> f64;
}

/// Uniformly random jitter from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandJitter;

impl Jitter for RandJitter {
    fn factor(&self, fraction: f64) -> f64 {
        if fraction <= 0.0 {
            return 1.0;
        }
        rand::thread_rng().gen_range((1.0 - fraction)..=(1.0 + fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unit;

    impl Jitter for Unit {
        fn factor(&self, _fraction: f64) -> f64 {
            1.0
        }
    }

    fn policy(base_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            jitter_fraction: 0.2,
        }
    }

    #[test]
    fn exponential_growth_then_cap() {
        let p = policy(1000, 5000);
        assert_eq!(p.base_backoff(1), Duration::from_millis(1000));
        assert_eq!(p.base_backoff(2), Duration::from_millis(2000));
        assert_eq!(p.base_backoff(3), Duration::from_millis(4000));
        assert_eq!(p.base_backoff(4), Duration::from_millis(5000));
        assert_eq!(p.base_backoff(40), Duration::from_millis(5000));
    }

    #[test]
    fn jitter_stays_within_fraction() {
        let p = policy(1000, 60_000);
        for _ in 0..200 {
            let d = p.backoff(1, &RandJitter, None);
            assert!(d >= Duration::from_millis(800), "{d:?}");
            assert!(d <= Duration::from_millis(1200), "{d:?}");
        }
    }

    #[test]
    fn zero_fraction_is_exact() {
        assert_eq!(RandJitter.factor(0.0), 1.0);
    }

    #[test]
    fn retry_after_raises_delay_up_to_cap() {
        let p = policy(100, 3000);
        assert_eq!(
            p.backoff(1, &Unit, Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(
            p.backoff(1, &Unit, Some(Duration::from_secs(30))),
            Duration::from_secs(3)
        );
        assert_eq!(
            p.backoff(1, &Unit, Some(Duration::from_millis(10))),
            Duration::from_millis(100)
        );
        assert_eq!(
            p.backoff(1, &Unit, Some(Duration::MAX)),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn from_config_clamps() {
        let config = RetryConfig {
            max_attempts: 0,
            base_delay_ms: 10,
            max_delay_ms: 20,
            jitter_fraction: 3.0,
        };
        let p = RetryPolicy::from_config(&config);
        assert_eq!(p.max_attempts, 1);
        assert_eq!(p.jitter_fraction, 1.0);
    }
}
