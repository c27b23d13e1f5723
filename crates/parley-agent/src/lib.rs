// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session orchestration for Parley.
//!
//! The [`SessionOrchestrator`] is the central coordinator that:
//! - Appends user turns to the conversation store
//! - Gates each call on the spend already incurred
//! - Sends requests through the resilient dispatcher to the active provider
//! - Records replies and their cost
//!
//! [`commands`] implements the REPL's slash commands on top of it.

pub mod commands;
pub mod registry;
pub mod session;

pub use commands::{Command, CommandOutput};
pub use registry::ProviderRegistry;
pub use session::{Outcome, SessionOrchestrator};
