// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retry and backoff for Parley provider calls.
//!
//! The [`Dispatcher`] is the only component that retries. Adapters classify
//! failures; the orchestrator interprets the dispatcher's terminal outcome.

pub mod dispatcher;
pub mod policy;
pub mod sleeper;

pub use dispatcher::Dispatcher;
pub use policy::{Jitter, RandJitter, RetryPolicy};
pub use sleeper::{Sleeper, TokioSleeper};
