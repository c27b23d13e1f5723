// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of session outcomes for the terminal.

use colored::Colorize;
use parley_agent::Outcome;
use parley_cost::Verdict;

/// One piece of terminal output, styled by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Model reply, printed to stdout.
    Reply(String),
    /// Spend notice, printed to stderr.
    Notice(String),
    /// Spend limit reached, printed to stderr.
    Limit(String),
    /// Failure, printed to stderr.
    Error(String),
}

/// Lines to print for an outcome, in order.
pub fn outcome_lines(outcome: &Outcome) -> Vec<Line> {
    match outcome {
        Outcome::Replied { text, notice, .. } => {
            let mut lines = vec![Line::Reply(text.clone())];
            match notice {
                Verdict::Ok => {}
                Verdict::Warn(msg) => lines.push(Line::Notice(msg.clone())),
                Verdict::Block(msg) => lines.push(Line::Limit(msg.clone())),
            }
            lines
        }
        Outcome::Blocked { reason } => vec![Line::Limit(reason.clone())],
        Outcome::Failed { error } => vec![Line::Error(error.to_string())],
    }
}

pub fn print_lines(lines: &[Line], assistant_label: &str) {
    for line in lines {
        match line {
            Line::Reply(text) => println!("{} {text}", format!("{assistant_label}:").cyan().bold()),
            Line::Notice(msg) => eprintln!("{}", msg.yellow()),
            Line::Limit(msg) => eprintln!("{}", msg.red().bold()),
            Line::Error(msg) => eprintln!("{}: {msg}", "error".red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{FailureKind, ParleyError, ProviderFailure};

    #[test]
    fn reply_with_warning() {
        let outcome = Outcome::Replied {
            text: "Hello!".into(),
            cost_usd: 0.2,
            notice: Verdict::Warn("Cost warning".into()),
        };
        assert_eq!(
            outcome_lines(&outcome),
            vec![
                Line::Reply("Hello!".into()),
                Line::Notice("Cost warning".into())
            ]
        );
    }

    #[test]
    fn plain_reply_has_one_line() {
        let outcome = Outcome::Replied {
            text: "Hi".into(),
            cost_usd: 0.0,
            notice: Verdict::Ok,
        };
        assert_eq!(outcome_lines(&outcome), vec![Line::Reply("Hi".into())]);
    }

    #[test]
    fn exhausted_failure_names_last_cause() {
        let outcome = Outcome::Failed {
            error: ParleyError::RetryExhausted {
                attempts: 3,
                last: ProviderFailure::new(FailureKind::Transient, "connection reset"),
            },
        };
        let lines = outcome_lines(&outcome);
        match &lines[..] {
            [Line::Error(msg)] => {
                assert!(msg.contains("3 attempts"), "{msg}");
                assert!(msg.contains("connection reset"), "{msg}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blocked_is_a_limit_line() {
        let outcome = Outcome::Blocked {
            reason: "Cost limit of $1.00 reached".into(),
        };
        assert_eq!(
            outcome_lines(&outcome),
            vec![Line::Limit("Cost limit of $1.00 reached".into())]
        );
    }
}
