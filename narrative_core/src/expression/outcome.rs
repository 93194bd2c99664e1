//! Result types for condition evaluation and command execution.
//!
//! Live play treats "could not evaluate" like "false" and "could not apply" like
//! a no-op, but these types keep the distinction visible to callers and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::parser::ParseError;

/// Why a condition atom or command could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Unresolved {
    #[error("'{0}' is not a registered stat")]
    UnknownStat(String),
    #[error("'{0}' is not an integer")]
    InvalidNumber(String),
    #[error("'{0}' is not a boolean")]
    InvalidBoolean(String),
    #[error("unknown directive '{0}'")]
    UnknownDirective(String),
    #[error("bad arguments to '{directive}': {reason}")]
    BadArguments { directive: String, reason: String },
    #[error(transparent)]
    Malformed(#[from] ParseError),
}

/// Outcome of evaluating a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    Satisfied,
    Unsatisfied,
    /// The condition could not be evaluated; live play treats this as false.
    Undetermined(Unresolved),
}

impl Evaluation {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Evaluation::Satisfied
        } else {
            Evaluation::Unsatisfied
        }
    }

    pub fn is_satisfied(&self) -> bool {
        matches!(self, Evaluation::Satisfied)
    }

    pub fn is_undetermined(&self) -> bool {
        matches!(self, Evaluation::Undetermined(_))
    }
}

/// What a single command token did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    StatUpdated { name: String, old: i64, new: i64 },
    FlagUpdated { name: String, value: bool },
    DirectiveApplied { name: String },
    /// Nothing changed; live play carries on.
    Ignored(Unresolved),
}

impl CommandOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, CommandOutcome::Ignored(_))
    }
}

/// Outcomes of every command in a command string, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub outcomes: Vec<CommandOutcome>,
}

impl ExecutionReport {
    /// True when every command was applied.
    pub fn is_clean(&self) -> bool {
        !self.outcomes.iter().any(CommandOutcome::is_ignored)
    }

    /// Reasons for every command that was ignored.
    pub fn ignored(&self) -> impl Iterator<Item = &Unresolved> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            CommandOutcome::Ignored(reason) => Some(reason),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
