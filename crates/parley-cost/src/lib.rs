// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost accounting for Parley sessions.
//!
//! This crate provides:
//! - **Pricing**: per-model rate table, exact-match lookup, config overrides
//! - **Cost ledger**: append-only record of every provider call with a running total
//! - **Budget**: warning/limit thresholds evaluated into a [`Verdict`]
//!
//! No I/O happens here; the ledger lives for one session.

pub mod amount;
pub mod budget;
pub mod ledger;
pub mod pricing;

pub use amount::Usd;
pub use budget::{CostState, Verdict, check, evaluate};
pub use ledger::{CostEntry, CostLedger, CostSummary};
pub use pricing::{ModelPricing, PriceTable};
