// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `parley shell` command implementation.
//!
//! Launches an interactive REPL with a colored prompt and readline history.
//! Lines starting with `/` are commands; everything else is sent to the
//! active provider. The session ends on `/quit`, Ctrl+C, Ctrl+D, or when
//! spend reaches the limit, and the cost summary is printed on the way out.

use colored::Colorize;
use parley_agent::commands::{self, Command, CommandOutput};
use parley_agent::SessionOrchestrator;
use parley_core::ParleyError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use crate::output::{outcome_lines, print_lines};

/// What the REPL loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Runs the `parley shell` interactive REPL.
pub async fn run_shell(mut session: SessionOrchestrator) -> Result<(), ParleyError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| ParleyError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "parley".bold().green());
    println!(
        "Using {} ({}). Type {} for commands, {} to exit.\n",
        session.active_provider().to_string().cyan(),
        session.active_model(),
        "/help".yellow(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if handle_line(&mut session, trimmed).await == Flow::Stop {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    let summary = session.cost_summary();
    if summary.calls > 0 {
        println!("\n{summary}");
    }
    info!(calls = summary.calls, total_usd = summary.state.running_total_usd(), "session ended");
    println!("Goodbye!");
    Ok(())
}

/// Process one non-empty line: run a command or send a message.
async fn handle_line(session: &mut SessionOrchestrator, line: &str) -> Flow {
    if let Some(command) = Command::parse(line) {
        return match commands::execute(&command, session) {
            CommandOutput::Info(text) => {
                println!("{text}");
                Flow::Continue
            }
            CommandOutput::Error(text) => {
                eprintln!("{}: {text}", "error".red());
                Flow::Continue
            }
            CommandOutput::Quit => Flow::Stop,
        };
    }

    let outcome = session.handle_user_message(line).await;
    print_lines(&outcome_lines(&outcome), &session.active_provider().to_string());

    if outcome.limit_reached() {
        eprintln!("{}", "Ending session: cost limit reached.".red());
        Flow::Stop
    } else {
        Flow::Continue
    }
}
