//! Dialogue Engine - plays conditionally gated lines one at a time.
//!
//! Line conditions are checked lazily as each line is reached, so a line's
//! commands can unlock or hide the lines after it.

use game_rules::{Dialogue, GameState};

use crate::expression::ExpressionEvaluator;

/// Result of asking the engine for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueStep {
    /// A line was shown; its commands have already run.
    Line(String),
    /// There is nothing more to show.
    Finished,
}

/// Sequencer for a single dialogue at a time.
#[derive(Debug, Clone)]
pub struct DialogueEngine {
    current: Option<Dialogue>,
    current_line: Option<usize>,
    finished: bool,
    displayed: Option<String>,
}

impl DialogueEngine {
    pub fn new() -> Self {
        Self {
            current: None,
            current_line: None,
            finished: true,
            displayed: None,
        }
    }

    /// Start playing a dialogue.
    ///
    /// Returns false, leaving the engine finished, when there is no dialogue,
    /// it has no lines, its condition fails, or none of its lines are eligible.
    pub fn play(
        &mut self,
        dialogue: Option<&Dialogue>,
        state: &mut GameState,
        evaluator: &mut ExpressionEvaluator,
    ) -> bool {
        self.stop();

        let Some(dialogue) = dialogue else {
            return false;
        };
        if dialogue.is_empty() || !evaluator.evaluate(state, &dialogue.condition) {
            return false;
        }

        self.current = Some(dialogue.clone());
        match self.advance(state, evaluator) {
            DialogueStep::Line(_) => true,
            DialogueStep::Finished => false,
        }
    }

    /// Play the first dialogue in list order that can be played.
    ///
    /// Returns the index of the dialogue now playing.
    pub fn play_first_possible(
        &mut self,
        dialogues: &[Dialogue],
        state: &mut GameState,
        evaluator: &mut ExpressionEvaluator,
    ) -> Option<usize> {
        let index = dialogues
            .iter()
            .position(|dialogue| self.play(Some(dialogue), state, evaluator));
        if index.is_none() {
            self.stop();
        }
        index
    }

    /// Move to the next eligible line after the current one, running its
    /// commands. Finishes the dialogue when no eligible line is left.
    pub fn advance(
        &mut self,
        state: &mut GameState,
        evaluator: &mut ExpressionEvaluator,
    ) -> DialogueStep {
        let Some(dialogue) = &self.current else {
            return DialogueStep::Finished;
        };

        let start = self.current_line.map_or(0, |index| index + 1);
        for (index, line) in dialogue.lines.iter().enumerate().skip(start) {
            if !evaluator.evaluate(state, &line.condition) {
                continue;
            }

            evaluator.execute(state, &line.commands);
            tracing::debug!(line = index, "Showing dialogue line");
            self.current_line = Some(index);
            self.finished = false;
            self.displayed = Some(line.message.clone());
            return DialogueStep::Line(line.message.clone());
        }

        self.stop();
        DialogueStep::Finished
    }

    /// Drop the current dialogue and clear the displayed text.
    pub fn stop(&mut self) {
        self.current = None;
        self.current_line = None;
        self.finished = true;
        self.displayed = None;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_dialogue(&self) -> Option<&Dialogue> {
        self.current.as_ref()
    }

    /// Index of the line on display.
    pub fn current_line_index(&self) -> Option<usize> {
        self.current_line
    }

    pub fn displayed_text(&self) -> Option<&str> {
        self.displayed.as_deref()
    }
}

impl Default for DialogueEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_rules::{GameConfig, Line};

    fn setup() -> (DialogueEngine, GameState, ExpressionEvaluator) {
        (
            DialogueEngine::new(),
            GameState::from_config(&GameConfig::default()),
            ExpressionEvaluator::with_seed(3),
        )
    }

    fn simple(message: &str) -> Dialogue {
        Dialogue::new(vec![Line::new(message)])
    }

    #[test]
    fn test_new_engine_is_finished() {
        let engine = DialogueEngine::new();
        assert!(engine.is_finished());
        assert!(engine.current_dialogue().is_none());
        assert!(engine.displayed_text().is_none());
    }

    #[test]
    fn test_play_none_or_empty() {
        let (mut engine, mut state, mut evaluator) = setup();
        assert!(!engine.play(None, &mut state, &mut evaluator));
        assert!(!engine.play(Some(&Dialogue::default()), &mut state, &mut evaluator));
        assert!(engine.is_finished());
    }

    #[test]
    fn test_play_with_failing_condition() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogue = simple("You put on a mask.").with_condition("hasMask");

        assert!(!engine.play(Some(&dialogue), &mut state, &mut evaluator));
        assert!(engine.is_finished());
        assert!(engine.current_dialogue().is_none());
    }

    #[test]
    fn test_play_runs_first_eligible_line() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogue = Dialogue::new(vec![
            Line::new("Rich").with_condition("money>1000"),
            Line::new("You buy groceries.").with_commands("food+3;money+0"),
        ]);

        assert!(engine.play(Some(&dialogue), &mut state, &mut evaluator));
        assert!(!engine.is_finished());
        assert_eq!(engine.current_line_index(), Some(1));
        assert_eq!(engine.displayed_text(), Some("You buy groceries."));
        assert_eq!(state.stats.get("food"), 3);
    }

    #[test]
    fn test_play_with_no_eligible_lines() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogue = Dialogue::new(vec![Line::new("Never").with_condition("hasCar")]);

        assert!(!engine.play(Some(&dialogue), &mut state, &mut evaluator));
        assert!(engine.is_finished());
    }

    #[test]
    fn test_advance_through_lines() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogue = Dialogue::new(vec![
            Line::new("One"),
            Line::new("Skipped").with_condition("!hasMask"),
            Line::new("Three"),
        ]);
        state.flags.set("hasMask", true);

        assert!(engine.play(Some(&dialogue), &mut state, &mut evaluator));
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Line("Three".to_string())
        );
        assert_eq!(engine.current_line_index(), Some(2));
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Finished
        );
        assert!(engine.is_finished());
        assert!(engine.displayed_text().is_none());
        assert!(engine.current_dialogue().is_none());

        // Advancing a finished engine does nothing.
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Finished
        );
    }

    #[test]
    fn test_line_commands_gate_later_lines() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogue = Dialogue::new(vec![
            Line::new("You find a mask on the bus.").with_commands("hasMask=true"),
            Line::new("You put it on.").with_condition("hasMask"),
            Line::new("You have no mask.").with_condition("!hasMask"),
        ]);

        assert!(engine.play(Some(&dialogue), &mut state, &mut evaluator));
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Line("You put it on.".to_string())
        );
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Finished
        );
    }

    #[test]
    fn test_play_first_possible_picks_first_playable() {
        let (mut engine, mut state, mut evaluator) = setup();
        state.stats.set("money", 5);
        let dialogues = vec![
            Dialogue::new(vec![Line::new("d1")
                .with_condition("money<100")
                .with_commands("money+50")])
            .with_condition("money>100"),
            simple("d2").with_condition("money<100"),
            Dialogue::new(vec![
                Line::new("d3").with_commands("money+1"),
                Line::new("d3 again").with_commands("@gameEnd(1)"),
            ]),
        ];

        let chosen = engine.play_first_possible(&dialogues, &mut state, &mut evaluator);

        assert_eq!(chosen, Some(1));
        assert_eq!(engine.displayed_text(), Some("d2"));
        assert_eq!(engine.current_dialogue(), Some(&dialogues[1]));
        // Neither the rejected d1 nor the unreached d3 ran any commands.
        assert_eq!(state.stats.get("money"), 5);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_play_first_possible_skips_dialogue_without_eligible_lines() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogues = vec![
            Dialogue::new(vec![Line::new("hidden").with_condition("hasCar")]),
            simple("shown"),
        ];

        let chosen = engine.play_first_possible(&dialogues, &mut state, &mut evaluator);
        assert_eq!(chosen, Some(1));
    }

    #[test]
    fn test_play_first_possible_none() {
        let (mut engine, mut state, mut evaluator) = setup();
        let dialogues = vec![simple("a").with_condition("hasCar")];

        assert_eq!(
            engine.play_first_possible(&dialogues, &mut state, &mut evaluator),
            None
        );
        assert!(engine.is_finished());
        assert_eq!(engine.play_first_possible(&[], &mut state, &mut evaluator), None);
    }

    #[test]
    fn test_play_replaces_current_dialogue() {
        let (mut engine, mut state, mut evaluator) = setup();
        let first = Dialogue::new(vec![Line::new("a1"), Line::new("a2")]);
        let second = simple("b1");

        assert!(engine.play(Some(&first), &mut state, &mut evaluator));
        assert!(engine.play(Some(&second), &mut state, &mut evaluator));
        assert_eq!(engine.current_line_index(), Some(0));
        assert_eq!(
            engine.advance(&mut state, &mut evaluator),
            DialogueStep::Finished
        );
    }
}
