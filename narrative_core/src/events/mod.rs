//! Scripted event evaluation.
//!
//! Each event is a list of trigger/action branches. Per pass, every event fires
//! at most one branch: the first whose trigger holds.

use game_rules::{GameState, ScriptedEvent};

use crate::expression::ExpressionEvaluator;

/// Runs scripted events against the game state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedEventEvaluator;

impl ScriptedEventEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every event once, in list order.
    ///
    /// Returns, per event, the index of the branch that fired. Actions run
    /// immediately, so a fired branch can change the triggers of later events.
    pub fn evaluate(
        &self,
        events: &[ScriptedEvent],
        state: &mut GameState,
        evaluator: &mut ExpressionEvaluator,
    ) -> Vec<Option<usize>> {
        events
            .iter()
            .map(|event| {
                let fired = event
                    .branches
                    .iter()
                    .position(|branch| evaluator.evaluate(state, &branch.trigger));

                if let Some(index) = fired {
                    evaluator.execute(state, &event.branches[index].action);
                    tracing::debug!(event = %event.name, branch = index, "Event branch fired");
                }
                fired
            })
            .collect()
    }
}
