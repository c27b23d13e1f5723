// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley ask` command implementation: one orchestrated turn, then exit.

use parley_agent::{Outcome, SessionOrchestrator};

use crate::output::{outcome_lines, print_lines};

/// Exit code when spend was already at the limit.
pub const EXIT_BLOCKED: i32 = 2;

/// Send `message`, print the reply, and return the process exit code.
pub async fn run_ask(mut session: SessionOrchestrator, message: &str) -> i32 {
    let outcome = session.handle_user_message(message).await;
    print_lines(&outcome_lines(&outcome), &session.active_provider().to_string());
    exit_code(&outcome)
}

fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Replied { .. } => 0,
        Outcome::Blocked { .. } => EXIT_BLOCKED,
        Outcome::Failed { .. } => 1,
    }
}
