// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic timing sources for the resilient dispatcher.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use parley_resilience::{Jitter, Sleeper};

/// A sleeper that returns immediately and records every requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.delays().len()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(delay);
        }
    }
}

/// A jitter source that always returns the same factor.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl FixedJitter {
    /// No jitter: the factor is always 1.0.
    pub fn none() -> Self {
        Self(1.0)
    }
}

impl Jitter for FixedJitter {
    fn factor(&self, _fraction: f64) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_without_waiting() {
        let sleeper = RecordingSleeper::new();
        sleeper.sleep(Duration::from_secs(3600)).await;
        sleeper.sleep(Duration::from_millis(5)).await;
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(3600), Duration::from_millis(5)]
        );
    }

    #[test]
    fn fixed_jitter_ignores_fraction() {
        assert_eq!(FixedJitter(0.8).factor(0.2), 0.8);
        assert_eq!(FixedJitter::none().factor(0.5), 1.0);
    }
}
