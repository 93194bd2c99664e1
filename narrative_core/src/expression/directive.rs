//! Built-in directives and their argument checking.

use super::outcome::Unresolved;
use super::parser::DirectiveCall;

/// Where a directive may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Condition,
    Command,
}

/// A directive call whose name and arguments have been checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Directive {
    /// `@rollSuccess(p)`: true with probability `p`.
    RollSuccess { odds: f64 },
    /// `@gameEnd(n)`: record ending `n` and end the game.
    GameEnd { ending: u32 },
}

impl Directive {
    pub const ROLL_SUCCESS: &'static str = "rollSuccess";
    pub const GAME_END: &'static str = "gameEnd";

    /// Resolve a parsed call into a known directive.
    pub fn resolve(call: &DirectiveCall) -> Result<Self, Unresolved> {
        match call.name.as_str() {
            Self::ROLL_SUCCESS => {
                let arg = single_arg(call)?;
                let odds = arg
                    .parse::<f64>()
                    .ok()
                    .filter(|odds| odds.is_finite())
                    .ok_or_else(|| bad_arguments(call, format!("'{}' is not a probability", arg)))?;
                Ok(Directive::RollSuccess { odds })
            }
            Self::GAME_END => {
                let arg = single_arg(call)?;
                let ending = arg
                    .parse::<u32>()
                    .map_err(|_| bad_arguments(call, format!("'{}' is not an ending number", arg)))?;
                Ok(Directive::GameEnd { ending })
            }
            _ => Err(Unresolved::UnknownDirective(call.name.clone())),
        }
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::RollSuccess { .. } => DirectiveKind::Condition,
            Directive::GameEnd { .. } => DirectiveKind::Command,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Directive::RollSuccess { .. } => Self::ROLL_SUCCESS,
            Directive::GameEnd { .. } => Self::GAME_END,
        }
    }
}

fn single_arg(call: &DirectiveCall) -> Result<&str, Unresolved> {
    match call.args.as_slice() {
        [arg] => Ok(arg.as_str()),
        args => Err(bad_arguments(
            call,
            format!("expected 1 argument, got {}", args.len()),
        )),
    }
}

fn bad_arguments(call: &DirectiveCall, reason: String) -> Unresolved {
    Unresolved::BadArguments {
        directive: call.name.clone(),
        reason,
    }
}
