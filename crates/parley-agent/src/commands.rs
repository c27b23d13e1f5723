// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands typed at the REPL.
//!
//! Commands never reach a provider. Parsing is separate from execution so
//! the binary can decide how to render each [`CommandOutput`].

use std::str::FromStr;

use parley_context::ConversationStore;
use parley_core::{ProviderKind, Role};
use strum::IntoEnumIterator;

use crate::session::SessionOrchestrator;

/// Maximum characters of a turn shown by `/history`.
pub const HISTORY_PREVIEW_CHARS: usize = 100;

pub const HELP_TEXT: &str = "\
Available commands:
  /help              Show this help message
  /model [provider]  Show or switch the active provider (openai, anthropic)
  /cost              Show the session cost summary
  /clear             Clear the conversation history
  /history           Show the conversation history
  /quit, /exit       Exit the chat";

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Model(Option<String>),
    Cost,
    Clear,
    History,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a REPL line. Returns `None` when the line is a chat message.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or("").to_ascii_lowercase();
        let arg = parts.next().map(str::to_string);

        Some(match name.as_str() {
            "help" => Command::Help,
            "model" => Command::Model(arg),
            "cost" => Command::Cost,
            "clear" => Command::Clear,
            "history" => Command::History,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        })
    }
}

/// What the REPL should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Informational text.
    Info(String),
    /// The command was rejected; render as an error.
    Error(String),
    /// End the session.
    Quit,
}

/// Run a command against the session.
pub fn execute(command: &Command, session: &mut SessionOrchestrator) -> CommandOutput {
    match command {
        Command::Help => CommandOutput::Info(HELP_TEXT.to_string()),
        Command::Model(None) => CommandOutput::Info(format!(
            "Current provider: {} (model {})\nAvailable: {}",
            session.active_provider(),
            session.active_model(),
            join_kinds(&session.available_providers()),
        )),
        Command::Model(Some(name)) => switch_model(name, session),
        Command::Cost => CommandOutput::Info(session.cost_summary().to_string()),
        Command::Clear => {
            let cleared = session.clear_history();
            CommandOutput::Info(format!("Conversation history cleared ({cleared} turns)."))
        }
        Command::History => CommandOutput::Info(render_history(session.store())),
        Command::Quit => CommandOutput::Quit,
        Command::Unknown(line) => CommandOutput::Error(format!(
            "Unknown command: {line}. Type /help for available commands."
        )),
    }
}

fn switch_model(name: &str, session: &mut SessionOrchestrator) -> CommandOutput {
    let Ok(kind) = ProviderKind::from_str(name) else {
        let all: Vec<_> = ProviderKind::iter().collect();
        return CommandOutput::Error(format!(
            "Unknown provider '{name}'. Choose one of: {}",
            join_kinds(&all)
        ));
    };

    match session.switch_provider(kind) {
        Ok(()) => CommandOutput::Info(format!(
            "Switched to {kind} (model {})",
            session.active_model()
        )),
        Err(e) => CommandOutput::Error(e.to_string()),
    }
}

fn join_kinds(kinds: &[ProviderKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per turn: uppercased role, content cut at
/// [`HISTORY_PREVIEW_CHARS`] with an ellipsis.
pub fn render_history(store: &ConversationStore) -> String {
    if store.is_empty() {
        return "No conversation history.".to_string();
    }

    store
        .turns()
        .iter()
        .map(|turn| {
            let role = match turn.role {
                Role::User => "USER",
                Role::Assistant => "ASSISTANT",
            };
            format!("{role}: {}", preview(&turn.content))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() <= HISTORY_PREVIEW_CHARS {
        flat
    } else {
        let cut: String = flat.chars().take(HISTORY_PREVIEW_CHARS).collect();
        format!("{cut}...")
    }
}
