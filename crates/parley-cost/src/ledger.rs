// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory cost ledger for one session.
//!
//! Each successful provider call is recorded as a [`CostEntry`]. The ledger
//! is append-only; its running total never decreases and equals the exact
//! sum of every recorded entry.

use std::fmt;

use parley_config::model::CostConfig;
use parley_core::{ParleyError, TokenUsage};
use tracing::debug;

use crate::amount::Usd;
use crate::budget::{self, CostState, Verdict};
use crate::pricing::PriceTable;

/// A single cost record representing one provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
    /// Model identifier the call was priced against.
    pub model_id: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost: Usd,
    /// Token counts were estimated locally, so `cost` is approximate.
    pub estimated: bool,
}

impl CostEntry {
    pub fn cost_usd(&self) -> f64 {
        self.cost.as_usd()
    }
}

/// Append-only per-session ledger with threshold evaluation.
#[derive(Debug, Clone)]
pub struct CostLedger {
    prices: PriceTable,
    entries: Vec<CostEntry>,
    state: CostState,
}

impl CostLedger {
    pub fn new(prices: PriceTable, warning_threshold_usd: f64, limit_threshold_usd: f64) -> Self {
        Self {
            prices,
            entries: Vec::new(),
            state: CostState::new(warning_threshold_usd, limit_threshold_usd),
        }
    }

    pub fn from_config(config: &CostConfig) -> Self {
        Self::new(
            PriceTable::from_config(config),
            config.warning_threshold_usd,
            config.limit_threshold_usd,
        )
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Price a call without recording it.
    pub fn price(
        &self,
        model_id: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<Usd, ParleyError> {
        self.prices.price(model_id, input_tokens, output_tokens)
    }

    /// Build the entry for a completed call, pricing it against `model_id`.
    pub fn entry_for(&self, model_id: &str, usage: &TokenUsage) -> Result<CostEntry, ParleyError> {
        let cost = self.price(model_id, usage.input_tokens, usage.output_tokens)?;
        Ok(CostEntry {
            model_id: model_id.to_string(),
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
            cost,
            estimated: usage.estimated,
        })
    }

    /// Append an entry and return the updated state.
    pub fn record(&mut self, entry: CostEntry) -> CostState {
        self.state.running_total = self.state.running_total + entry.cost;
        debug!(
            model = %entry.model_id,
            input_tokens = entry.input_tokens,
            output_tokens = entry.output_tokens,
            cost_usd = entry.cost_usd(),
            estimated = entry.estimated,
            running_total_usd = self.state.running_total_usd(),
            "recorded cost entry"
        );
        self.entries.push(entry);
        self.state
    }

    pub fn state(&self) -> CostState {
        self.state
    }

    /// Evaluate the current state against the thresholds, logging a
    /// `Warn` or `Block`.
    pub fn check(&self) -> Verdict {
        budget::check(&self.state)
    }

    /// The current verdict, without logging.
    pub fn verdict(&self) -> Verdict {
        budget::evaluate(&self.state)
    }

    pub fn entries(&self) -> &[CostEntry] {
        &self.entries
    }

    pub fn total(&self) -> Usd {
        self.state.running_total
    }

    pub fn summary(&self) -> CostSummary {
        CostSummary {
            calls: self.entries.len(),
            estimated_calls: self.entries.iter().filter(|e| e.estimated).count(),
            input_tokens: self.entries.iter().map(|e| u64::from(e.input_tokens)).sum(),
            output_tokens: self.entries.iter().map(|e| u64::from(e.output_tokens)).sum(),
            state: self.state,
            verdict: self.verdict(),
        }
    }
}

/// Snapshot of session spend, rendered by `/cost` and at exit.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSummary {
    pub calls: usize,
    pub estimated_calls: usize,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub state: CostState,
    pub verdict: Verdict,
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "SESSION COST SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total API Calls: {}", self.calls)?;
        writeln!(
            f,
            "Total Tokens: {} input -> {} output",
            self.input_tokens, self.output_tokens
        )?;
        writeln!(f, "Total Cost: {}", self.state.running_total)?;
        if self.estimated_calls > 0 {
            writeln!(
                f,
                "  ({} of {} calls used estimated token counts)",
                self.estimated_calls, self.calls
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Warning Threshold: ${:.2}",
            self.state.warning_threshold_usd
        )?;
        writeln!(f, "Limit Threshold: ${:.2}", self.state.limit_threshold_usd)?;
        match &self.verdict {
            Verdict::Block(_) => writeln!(
                f,
                "\nLIMIT EXCEEDED! Cost has reached {}",
                self.state.running_total
            )?,
            Verdict::Warn(_) => writeln!(f, "\nWarning: Cost is {}", self.state.running_total)?,
            Verdict::Ok => {}
        }
        write!(f, "{rule}")
    }
}
