// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spend thresholds and the verdict gate.
//!
//! Enforcement is eventual: `evaluate` looks only at spend already incurred,
//! never at the projected cost of the next call. The orchestrator checks
//! before each request (so a session over the limit makes no further calls)
//! and again after each reply (so the user learns the limit was crossed by
//! the call that just completed).
//!
//! Both comparisons use `>=`, so a threshold of 0 trips immediately.

use tracing::{error, warn};

use crate::amount::Usd;

/// Running total plus the two configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostState {
    pub running_total: Usd,
    pub warning_threshold_usd: f64,
    pub limit_threshold_usd: f64,
}

impl CostState {
    pub fn new(warning_threshold_usd: f64, limit_threshold_usd: f64) -> Self {
        Self {
            running_total: Usd::ZERO,
            warning_threshold_usd,
            limit_threshold_usd,
        }
    }

    pub fn running_total_usd(&self) -> f64 {
        self.running_total.as_usd()
    }
}

/// Outcome of evaluating a [`CostState`] against its thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Warn(String),
    Block(String),
}

impl Verdict {
    pub fn is_block(&self) -> bool {
        matches!(self, Verdict::Block(_))
    }

    /// The user-facing message for `Warn` and `Block`.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Ok => None,
            Verdict::Warn(msg) | Verdict::Block(msg) => Some(msg),
        }
    }
}

/// Evaluate thresholds without logging. `Block` wins over `Warn` whatever
/// the warning threshold is.
pub fn evaluate(state: &CostState) -> Verdict {
    let total = state.running_total_usd();

    if total >= state.limit_threshold_usd {
        Verdict::Block(format!(
            "Cost limit of ${:.2} reached: session total is {}",
            state.limit_threshold_usd, state.running_total
        ))
    } else if total >= state.warning_threshold_usd {
        Verdict::Warn(format!(
            "Cost warning: session total is {} (warning threshold ${:.2})",
            state.running_total, state.warning_threshold_usd
        ))
    } else {
        Verdict::Ok
    }
}

/// [`evaluate`], logging `Block` at error and `Warn` at warn.
pub fn check(state: &CostState) -> Verdict {
    let verdict = evaluate(state);
    let total = state.running_total_usd();
    match &verdict {
        Verdict::Block(_) => error!(
            running_total = total,
            limit = state.limit_threshold_usd,
            "cost limit reached"
        ),
        Verdict::Warn(_) => warn!(
            running_total = total,
            warning = state.warning_threshold_usd,
            "cost warning threshold reached"
        ),
        Verdict::Ok => {}
    }
    verdict
}
