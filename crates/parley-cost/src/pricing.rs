// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost calculation.
//!
//! Built-in rates (USD per million tokens):
//!
//! gpt-4o-mini:                input=$0.15,  output=$0.60
//! gpt-4o:                     input=$2.50,  output=$10.00
//! claude-3-5-haiku-20241022:  input=$0.80,  output=$4.00
//! claude-3-5-sonnet-20241022: input=$3.00,  output=$15.00

use std::collections::HashMap;

use parley_config::model::CostConfig;
use parley_core::ParleyError;

use crate::amount::Usd;

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPricing {
    /// Cost per million input tokens.
    pub input_per_mtok: f64,
    /// Cost per million output tokens.
    pub output_per_mtok: f64,
}

impl ModelPricing {
    pub const fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }

    /// Cost of one call: `input/1e6 * input_rate + output/1e6 * output_rate`.
    ///
    /// Computed in picodollars so a rate with up to six decimals yields an
    /// exact amount.
    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> Usd {
        let input = per_token(self.input_per_mtok).saturating_mul(u64::from(input_tokens));
        let output = per_token(self.output_per_mtok).saturating_mul(u64::from(output_tokens));
        Usd::from_picodollars(input.saturating_add(output))
    }
}

/// Picodollars per token for a per-million rate.
fn per_token(rate_per_mtok: f64) -> u64 {
    // $r per 1e6 tokens == r * 1e6 picodollars per token.
    (rate_per_mtok * 1e6).round() as u64
}

const BUILTIN_PRICING: &[(&str, ModelPricing)] = &[
    ("gpt-4o-mini", ModelPricing::new(0.15, 0.60)),
    ("gpt-4o", ModelPricing::new(2.50, 10.00)),
    ("claude-3-5-haiku-20241022", ModelPricing::new(0.80, 4.00)),
    ("claude-3-5-sonnet-20241022", ModelPricing::new(3.00, 15.00)),
];

/// Lookup table from model id to rates. Exact match only.
#[derive(Debug, Clone)]
pub struct PriceTable {
    rates: HashMap<String, ModelPricing>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PriceTable {
    /// An empty table: every lookup fails with `UnknownModel`.
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// The compiled-in rates.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (model, pricing) in BUILTIN_PRICING {
            table.insert(*model, *pricing);
        }
        table
    }

    /// Built-in rates with `[cost.pricing]` entries layered on top.
    pub fn from_config(config: &CostConfig) -> Self {
        let mut table = Self::builtin();
        for (model, rate) in &config.pricing {
            table.insert(
                model.clone(),
                ModelPricing::new(rate.input_per_mtok, rate.output_per_mtok),
            );
        }
        table
    }

    /// Register or replace the rates for `model`.
    pub fn insert(&mut self, model: impl Into<String>, pricing: ModelPricing) {
        self.rates.insert(model.into(), pricing);
    }

    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.rates.get(model)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.rates.contains_key(model)
    }

    /// Deterministic cost for one call against `model`.
    pub fn price(
        &self,
        model: &str,
        input_tokens: u32,
        output_tokens: u32,
    ) -> Result<Usd, ParleyError> {
        self.get(model)
            .map(|p| p.cost(input_tokens, output_tokens))
            .ok_or_else(|| ParleyError::UnknownModel {
                model: model.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_config::model::ModelRateConfig;

    #[test]
    fn gpt_4o_mini_example() {
        let table = PriceTable::builtin();
        let cost = table.price("gpt-4o-mini", 1000, 500).unwrap();
        assert_eq!(cost.as_usd(), 0.00045);
    }

    #[test]
    fn haiku_pricing() {
        let table = PriceTable::builtin();
        let cost = table
            .price("claude-3-5-haiku-20241022", 1_000_000, 1_000_000)
            .unwrap();
        assert_eq!(cost.as_usd(), 4.80);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let table = PriceTable::builtin();
        let err = table.price("gpt-5-ultra", 10, 10).unwrap_err();
        assert_eq!(
            err,
            ParleyError::UnknownModel {
                model: "gpt-5-ultra".into()
            }
        );
    }

    #[test]
    fn lookup_is_exact() {
        let table = PriceTable::builtin();
        assert!(table.contains("gpt-4o-mini"));
        assert!(!table.contains("GPT-4O-MINI"));
        assert!(!table.contains("gpt-4o-mini-2024"));
    }

    #[test]
    fn zero_tokens_zero_cost() {
        let table = PriceTable::builtin();
        assert_eq!(table.price("gpt-4o", 0, 0).unwrap(), Usd::ZERO);
    }

    #[test]
    fn config_overrides_and_extends() {
        let mut config = CostConfig::default();
        config.pricing.insert(
            "gpt-4o-mini".into(),
            ModelRateConfig {
                input_per_mtok: 1.0,
                output_per_mtok: 2.0,
            },
        );
        config.pricing.insert(
            "local-llama".into(),
            ModelRateConfig {
                input_per_mtok: 0.0,
                output_per_mtok: 0.0,
            },
        );
        let table = PriceTable::from_config(&config);
        assert_eq!(
            table.price("gpt-4o-mini", 1_000_000, 0).unwrap().as_usd(),
            1.0
        );
        assert_eq!(table.price("local-llama", 5000, 5000).unwrap(), Usd::ZERO);
        assert!(table.contains("claude-3-5-haiku-20241022"));
    }

    #[test]
    fn empty_table_knows_nothing() {
        assert!(PriceTable::empty().price("gpt-4o-mini", 1, 1).is_err());
    }
}
