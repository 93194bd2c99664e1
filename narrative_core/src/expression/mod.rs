//! Expression evaluator - runs designer-authored conditions and commands
//! against the game state.
//!
//! Conditions are read-only apart from the stochastic `@rollSuccess` directive.
//! Commands assign to stats (`money+50`) or flags (`hasMask=true`) and may
//! call command directives (`@gameEnd(1)`). Neither path ever fails: anything
//! that cannot be evaluated reads as false, and anything that cannot be applied
//! is skipped. The detailed results say which of those happened.

mod directive;
mod outcome;
mod parser;

pub use directive::*;
pub use outcome::*;
pub use parser::*;

use game_rules::{roll_over_minutes, stat_names, GameState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Evaluates conditions and executes commands.
///
/// The evaluator owns the random source used by `@rollSuccess`, so seeding it
/// makes a play-through reproducible.
#[derive(Debug, Clone)]
pub struct ExpressionEvaluator {
    rng: StdRng,
}

impl ExpressionEvaluator {
    /// Create an evaluator seeded from system entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Create an evaluator with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Evaluate a condition. Empty conditions pass; undeterminable ones fail.
    pub fn evaluate(&mut self, state: &GameState, condition: &str) -> bool {
        match self.evaluate_detailed(state, condition) {
            Evaluation::Satisfied => true,
            Evaluation::Unsatisfied => false,
            Evaluation::Undetermined(reason) => {
                tracing::warn!(
                    condition = %condition,
                    reason = %reason,
                    "Condition could not be evaluated"
                );
                false
            }
        }
    }

    /// Evaluate a condition, keeping "false" and "could not evaluate" apart.
    ///
    /// Clauses are checked left to right and evaluation stops at the first clause
    /// that does not hold. Within a clause it stops at the first atom that holds.
    pub fn evaluate_detailed(&mut self, state: &GameState, condition: &str) -> Evaluation {
        let clauses = split_condition(condition);
        if clauses.iter().any(Vec::is_empty) {
            return Evaluation::Undetermined(ParseError::EmptyClause(condition.to_string()).into());
        }

        for clause in clauses {
            let result = self.evaluate_clause(state, &clause);
            if !result.is_satisfied() {
                return result;
            }
        }
        Evaluation::Satisfied
    }

    fn evaluate_clause(&mut self, state: &GameState, alternatives: &[&str]) -> Evaluation {
        let mut undetermined = None;
        for text in alternatives {
            match self.evaluate_atom(state, text) {
                Evaluation::Satisfied => return Evaluation::Satisfied,
                Evaluation::Unsatisfied => {}
                Evaluation::Undetermined(reason) => {
                    undetermined.get_or_insert(reason);
                }
            }
        }
        match undetermined {
            Some(reason) => Evaluation::Undetermined(reason),
            None => Evaluation::Unsatisfied,
        }
    }

    fn evaluate_atom(&mut self, state: &GameState, text: &str) -> Evaluation {
        let atom = match Atom::parse(text) {
            Ok(atom) => atom,
            Err(err) => return Evaluation::Undetermined(err.into()),
        };

        match atom {
            Atom::Directive(call) => match Directive::resolve(&call) {
                Ok(Directive::RollSuccess { odds }) => {
                    Evaluation::from_bool(self.roll_success(odds))
                }
                Ok(other) => Evaluation::Undetermined(Unresolved::UnknownDirective(
                    other.name().to_string(),
                )),
                Err(reason) => Evaluation::Undetermined(reason),
            },
            Atom::Comparison { stat, op, value } => {
                let Some(current) = state.stats.try_get(&stat) else {
                    return Evaluation::Undetermined(Unresolved::UnknownStat(stat));
                };
                match value.parse::<i64>() {
                    Ok(rhs) => Evaluation::from_bool(op.compare(current, rhs)),
                    Err(_) => Evaluation::Undetermined(Unresolved::InvalidNumber(value)),
                }
            }
            Atom::Flag { name, negated } => {
                Evaluation::from_bool(state.flags.get(&name) != negated)
            }
        }
    }

    /// Roll against `odds` in `[0, 1]`. Zero never succeeds, one always does.
    fn roll_success(&mut self, odds: f64) -> bool {
        if odds <= 0.0 {
            return false;
        }
        if odds >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() <= odds
    }

    /// Execute a `;`-separated command string.
    pub fn execute(&mut self, state: &mut GameState, commands: &str) -> ExecutionReport {
        let outcomes = split_commands(commands)
            .map(|token| {
                let outcome = self.execute_one(state, token);
                if let CommandOutcome::Ignored(reason) = &outcome {
                    tracing::warn!(command = %token, reason = %reason, "Command ignored");
                }
                outcome
            })
            .collect();
        ExecutionReport { outcomes }
    }

    fn execute_one(&mut self, state: &mut GameState, token: &str) -> CommandOutcome {
        let command = match Command::parse(token) {
            Ok(command) => command,
            Err(err) => return CommandOutcome::Ignored(err.into()),
        };

        match command {
            Command::Directive(call) => match Directive::resolve(&call) {
                Ok(Directive::GameEnd { ending }) => {
                    state.end_game(ending);
                    CommandOutcome::DirectiveApplied {
                        name: Directive::GAME_END.to_string(),
                    }
                }
                Ok(other) => CommandOutcome::Ignored(Unresolved::UnknownDirective(
                    other.name().to_string(),
                )),
                Err(reason) => CommandOutcome::Ignored(reason),
            },
            Command::Assign { target, op, value } => match state.stats.try_get(&target) {
                Some(current) => assign_stat(state, &target, current, op, &value),
                None => match parse_bool(&value) {
                    Some(flag) => {
                        state.flags.set(&target, flag);
                        CommandOutcome::FlagUpdated {
                            name: target,
                            value: flag,
                        }
                    }
                    None => CommandOutcome::Ignored(Unresolved::InvalidBoolean(value)),
                },
            },
        }
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn assign_stat(
    state: &mut GameState,
    name: &str,
    current: i64,
    op: AssignOp,
    value: &str,
) -> CommandOutcome {
    // Unparseable operands count as zero.
    let operand = value.parse::<i64>().unwrap_or_else(|_| {
        tracing::warn!(stat = %name, value = %value, "Non-integer operand treated as 0");
        0
    });
    let new = op.apply(current, operand);

    // Time of day rolls over into the day counter. The time is stored first so
    // day observers see the new time of day.
    if name == stat_names::TIME {
        let (minutes, days) = roll_over_minutes(new);
        state.stats.set(name, minutes);
        if days > 0 {
            let day = state.stats.get(stat_names::DAY);
            state.stats.set(stat_names::DAY, day.saturating_add(days));
        }
    } else {
        state.stats.set(name, new);
    }

    CommandOutcome::StatUpdated {
        name: name.to_string(),
        old: current,
        new: state.stats.get(name),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
