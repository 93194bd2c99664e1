//! Authoring-time validation of scripts.
//!
//! Live play tolerates bad scripts. These checks do not: they report every
//! malformed condition or command in a content pack so it can be fixed before
//! the game runs.

use std::fmt;

use game_rules::{ContentPack, GameConfig};
use serde::{Deserialize, Serialize};

use crate::expression::{
    parse_commands, parse_condition, Atom, Command, Directive, DirectiveCall, DirectiveKind,
    Unresolved,
};

/// A problem found in one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Where the script lives, e.g. `action 'Work' dialogue 0 line 2 commands`.
    pub location: String,
    pub script: String,
    pub problem: Unresolved,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (in '{}')", self.location, self.problem, self.script)
    }
}

/// Check one condition against the configured stats.
pub fn validate_condition(condition: &str, config: &GameConfig) -> Result<(), Unresolved> {
    let condition = parse_condition(condition)?;
    for atom in condition.atoms() {
        match atom {
            Atom::Directive(call) => check_directive(call, DirectiveKind::Condition)?,
            Atom::Comparison { stat, value, .. } => {
                check_stat(stat, config)?;
                check_integer(value)?;
            }
            Atom::Flag { .. } => {}
        }
    }
    Ok(())
}

/// Check a command string against the configured stats.
///
/// Assignments to names that are not stats are flag assignments and must have
/// a boolean value.
pub fn validate_commands(commands: &str, config: &GameConfig) -> Result<(), Unresolved> {
    for command in parse_commands(commands)? {
        match &command {
            Command::Directive(call) => check_directive(call, DirectiveKind::Command)?,
            Command::Assign { target, value, .. } => {
                if config.stat(target).is_some() {
                    check_integer(value)?;
                } else if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false")
                {
                    return Err(Unresolved::InvalidBoolean(value.clone()));
                }
            }
        }
    }
    Ok(())
}

/// Check every script in a content pack and return all issues found.
pub fn validate_content(content: &ContentPack, config: &GameConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut check = |location: String, script: &str, result: Result<(), Unresolved>| {
        if let Err(problem) = result {
            issues.push(ValidationIssue {
                location,
                script: script.to_string(),
                problem,
            });
        }
    };

    for action in &content.actions {
        let prefix = format!("action '{}'", action.name);
        check(
            format!("{} enabled condition", prefix),
            &action.enabled_condition,
            validate_condition(&action.enabled_condition, config),
        );
        for (d, dialogue) in action.dialogues.iter().enumerate() {
            let prefix = format!("{} dialogue {}", prefix, d);
            check_dialogue(&prefix, dialogue, config, &mut check);
        }
    }

    for event in &content.start_of_day_events {
        for (b, branch) in event.branches.iter().enumerate() {
            let prefix = format!("event '{}' branch {}", event.name, b);
            check(
                format!("{} trigger", prefix),
                &branch.trigger,
                validate_condition(&branch.trigger, config),
            );
            check(
                format!("{} action", prefix),
                &branch.action,
                validate_commands(&branch.action, config),
            );
        }
    }

    for (d, dialogue) in content.start_of_day_dialogues.iter().enumerate() {
        let prefix = format!("start-of-day dialogue {}", d);
        check_dialogue(&prefix, dialogue, config, &mut check);
    }

    for issue in &issues {
        tracing::warn!(location = %issue.location, problem = %issue.problem, "Invalid script");
    }
    issues
}

fn check_dialogue(
    prefix: &str,
    dialogue: &game_rules::Dialogue,
    config: &GameConfig,
    check: &mut impl FnMut(String, &str, Result<(), Unresolved>),
) {
    check(
        format!("{} condition", prefix),
        &dialogue.condition,
        validate_condition(&dialogue.condition, config),
    );
    for (l, line) in dialogue.lines.iter().enumerate() {
        check(
            format!("{} line {} condition", prefix, l),
            &line.condition,
            validate_condition(&line.condition, config),
        );
        check(
            format!("{} line {} commands", prefix, l),
            &line.commands,
            validate_commands(&line.commands, config),
        );
    }
}

fn check_directive(call: &DirectiveCall, expected: DirectiveKind) -> Result<(), Unresolved> {
    let directive = Directive::resolve(call)?;
    if directive.kind() != expected {
        return Err(Unresolved::BadArguments {
            directive: directive.name().to_string(),
            reason: format!("cannot be used as a {:?} directive", expected).to_lowercase(),
        });
    }
    Ok(())
}

fn check_stat(name: &str, config: &GameConfig) -> Result<(), Unresolved> {
    match config.stat(name) {
        Some(_) => Ok(()),
        None => Err(Unresolved::UnknownStat(name.to_string())),
    }
}

fn check_integer(value: &str) -> Result<(), Unresolved> {
    value
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| Unresolved::InvalidNumber(value.to_string()))
}
