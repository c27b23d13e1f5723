// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Parley integration tests.
//!
//! Provides scripted adapters and deterministic timing so sessions can be
//! driven end to end without network access or wall-clock waits.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted provider adapter that records requests
//! - [`RecordingSleeper`] / [`FixedJitter`] - Deterministic dispatcher timing
//! - [`TestHarness`] - A session orchestrator wired to mock providers

pub mod harness;
pub mod mock_provider;
pub mod timing;

pub use harness::{TestHarness, test_config};
pub use mock_provider::{MockProvider, reply};
pub use timing::{FixedJitter, RecordingSleeper};
