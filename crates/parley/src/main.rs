// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parley - a command-line chat client for OpenAI and Anthropic models.
//!
//! This is the binary entry point.

mod ask;
mod output;
mod shell;

use std::str::FromStr;

use clap::{Parser, Subcommand};
use parley_agent::SessionOrchestrator;
use parley_config::ParleyConfig;
use parley_core::ProviderKind;
use tracing::warn;

/// Parley - chat with OpenAI or Anthropic models, with spend limits.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about, long_about = None)]
struct Cli {
    /// Provider to start with, overriding DEFAULT_PROVIDER.
    #[arg(long, global = true, value_parser = parse_provider)]
    provider: Option<ProviderKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Launch an interactive chat session (default).
    Shell,
    /// Send a single message, print the reply, and exit.
    Ask {
        /// The message to send.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

fn parse_provider(raw: &str) -> Result<ProviderKind, String> {
    ProviderKind::from_str(raw)
        .map_err(|_| format!("unknown provider '{raw}' (expected openai or anthropic)"))
}

#[tokio::main]
async fn main() {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match parley_config::load_and_validate_for(cli.provider) {
        Ok(config) => config,
        Err(errors) => {
            parley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(config.log.filter_directive().unwrap_or("info"));
    log_config_warnings(&config);

    let session = match SessionOrchestrator::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("parley: {e}");
            std::process::exit(1);
        }
    };

    let code = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => match shell::run_shell(session).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("parley: {e}");
                1
            }
        },
        Commands::Ask { message } => ask::run_ask(session, &message.join(" ")).await,
    };

    std::process::exit(code);
}

fn log_config_warnings(config: &ParleyConfig) {
    for message in parley_config::config_warnings(config) {
        warn!("{message}");
    }
}

/// Initializes the tracing subscriber on stderr with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("parley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tracing_test::traced_test;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["parley"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.provider.is_none());
    }

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from(["parley", "ask", "what", "is", "rust?"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Ask {
                message: vec!["what".into(), "is".into(), "rust?".into()]
            })
        );
    }

    #[test]
    fn ask_requires_a_message() {
        assert!(Cli::try_parse_from(["parley", "ask"]).is_err());
    }

    #[test]
    fn provider_flag_is_case_insensitive_and_global() {
        let cli = Cli::try_parse_from(["parley", "shell", "--provider", "Anthropic"]).unwrap();
        assert_eq!(cli.provider, Some(ProviderKind::Anthropic));
        assert!(Cli::try_parse_from(["parley", "--provider", "gemini"]).is_err());
    }

    #[test]
    fn session_starts_from_config_with_key() {
        let mut config = ParleyConfig::default();
        config.openai.api_key = Some(SecretString::from("sk-test".to_string()));
        let session = SessionOrchestrator::from_config(&config).unwrap();
        assert_eq!(session.active_provider(), ProviderKind::OpenAi);
        assert_eq!(session.active_model(), "gpt-4o-mini");
    }

    #[test]
    #[traced_test]
    fn warning_above_limit_is_logged() {
        let mut config = ParleyConfig::default();
        config.cost.warning_threshold_usd = 5.0;
        config.cost.limit_threshold_usd = 1.0;
        log_config_warnings(&config);
        assert!(logs_contain("WARN"));
        assert!(logs_contain("cost warning threshold ($5.00) is above the limit ($1.00)"));
    }

    #[test]
    #[traced_test]
    fn default_config_logs_no_warnings() {
        log_config_warnings(&ParleyConfig::default());
        assert!(!logs_contain("above the limit"));
    }
}
