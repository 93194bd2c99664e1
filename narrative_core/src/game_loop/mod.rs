//! Game Loop - the day/activity/ending state machine.
//!
//! The controller owns the game state and every engine that works on it.
//! It is pumped by [`GameLoopController::tick`], makes at most one transition
//! per tick, and otherwise only reacts to player input:
//! [`perform_action`](GameLoopController::perform_action),
//! [`advance_dialogue`](GameLoopController::advance_dialogue) and
//! [`close_notifications`](GameLoopController::close_notifications).
//!
//! ```text
//! Setup -> StartOfDayEvents -> StartOfDayDialogues -> ActivitiesSelection
//!              ^                                          |        ^
//!              |                                          v        |
//!              +------------- (new day) ------------ PerformAction-+
//!                                                         |
//!                                                         v
//!                                                      GameEnd
//! ```

mod presenter;

pub use presenter::*;

use std::cell::Cell;
use std::rc::Rc;

use game_rules::{
    flag_names, stat_names, ContentPack, CovidInfectionModel, Dialogue, Exposure, GameConfig,
    GameState, InfectionModel, StatChange,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dialogue::{DialogueEngine, DialogueStep};
use crate::events::ScriptedEventEvaluator;
use crate::expression::ExpressionEvaluator;

/// Ending recorded when the player simply runs out of days.
pub const DEFAULT_ENDING: u32 = 0;

/// States of the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameLoopState {
    Setup,
    StartOfDayEvents,
    StartOfDayDialogues,
    ActivitiesSelection,
    PerformAction,
    /// Terminal.
    GameEnd,
}

/// Input rejected by the game loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameLoopError {
    #[error("actions can only be performed while selecting activities (currently {0:?})")]
    NotAcceptingActions(GameLoopState),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("action '{0}' is not enabled")]
    ActionDisabled(String),
}

/// Sequencer composing the evaluator and engines into the daily cycle.
pub struct GameLoopController {
    config: GameConfig,
    content: ContentPack,
    state: GameState,
    evaluator: ExpressionEvaluator,
    dialogue: DialogueEngine,
    events: ScriptedEventEvaluator,
    infection: Box<dyn InfectionModel>,
    rng: StdRng,

    phase: GameLoopState,
    pending: Vec<Dialogue>,
    current_action: Option<String>,

    // Set by store observers, consumed by the loop.
    new_day: Rc<Cell<bool>>,
    dirty: Rc<Cell<bool>>,
}

impl GameLoopController {
    /// Create a controller seeded from system entropy.
    pub fn new(config: GameConfig, content: ContentPack) -> Self {
        Self::from_rng(config, content, StdRng::from_entropy())
    }

    /// Create a controller whose every random choice follows `seed`.
    pub fn with_seed(config: GameConfig, content: ContentPack, seed: u64) -> Self {
        Self::from_rng(config, content, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, content: ContentPack, mut rng: StdRng) -> Self {
        let evaluator = ExpressionEvaluator::with_seed(rng.gen());
        let mut state = GameState::from_config(&config);

        let new_day = Rc::new(Cell::new(false));
        let dirty = Rc::new(Cell::new(false));

        let (day_flag, stats_dirty) = (Rc::clone(&new_day), Rc::clone(&dirty));
        state.stats.subscribe(move |change: &StatChange| {
            if change.name == stat_names::DAY && change.increased() {
                day_flag.set(true);
            }
            stats_dirty.set(true);
        });
        let flags_dirty = Rc::clone(&dirty);
        state.flags.subscribe(move |_| flags_dirty.set(true));

        Self {
            config,
            content,
            state,
            evaluator,
            dialogue: DialogueEngine::new(),
            events: ScriptedEventEvaluator::new(),
            infection: Box::new(CovidInfectionModel),
            rng,
            phase: GameLoopState::Setup,
            pending: Vec::new(),
            current_action: None,
            new_day,
            dirty,
        }
    }

    /// Replace the infection collaborator.
    pub fn with_infection_model(mut self, model: impl InfectionModel + 'static) -> Self {
        self.infection = Box::new(model);
        self
    }

    pub fn current_state(&self) -> GameLoopState {
        self.phase
    }

    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for hosts and debugging tools. Changes made while
    /// selecting activities refresh the action buttons on the next tick.
    pub fn game_state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    pub fn dialogue(&self) -> &DialogueEngine {
        &self.dialogue
    }

    /// Start-of-day dialogues still waiting to be shown.
    pub fn pending_notifications(&self) -> usize {
        self.pending.len()
    }

    /// Start a new play-through on the next tick. This is the only way out of
    /// `GameEnd`.
    pub fn restart(&mut self) {
        tracing::debug!(from = ?self.phase, "Game loop restarted");
        self.phase = GameLoopState::Setup;
    }

    /// Pump the state machine once and return the state it is now in.
    pub fn tick(&mut self, presenter: &mut dyn Presenter) -> GameLoopState {
        let next = match self.phase {
            GameLoopState::Setup => {
                self.setup();
                GameLoopState::StartOfDayEvents
            }
            GameLoopState::StartOfDayEvents => {
                self.start_day();
                GameLoopState::StartOfDayDialogues
            }
            GameLoopState::StartOfDayDialogues => self.play_notifications(presenter),
            GameLoopState::ActivitiesSelection => {
                if self.dirty.get() {
                    self.refresh_interactables(presenter);
                }
                GameLoopState::ActivitiesSelection
            }
            GameLoopState::PerformAction => self.finish_action(),
            GameLoopState::GameEnd => GameLoopState::GameEnd,
        };

        self.transition(next, presenter);
        self.phase
    }

    /// Start the named action. Returns false when none of its dialogues can
    /// play, in which case nothing happens.
    pub fn perform_action(
        &mut self,
        name: &str,
        presenter: &mut dyn Presenter,
    ) -> Result<bool, GameLoopError> {
        if self.phase != GameLoopState::ActivitiesSelection {
            return Err(GameLoopError::NotAcceptingActions(self.phase));
        }

        let action = self
            .content
            .action(name)
            .ok_or_else(|| GameLoopError::UnknownAction(name.to_string()))?;
        if !self.evaluator.evaluate(&self.state, &action.enabled_condition) {
            return Err(GameLoopError::ActionDisabled(name.to_string()));
        }

        let started = self
            .dialogue
            .play_first_possible(&action.dialogues, &mut self.state, &mut self.evaluator)
            .is_some();
        if !started {
            tracing::debug!(action = %name, "Action has no playable dialogue");
            return Ok(false);
        }

        tracing::debug!(action = %name, "Performing action");
        self.show_current_line(presenter);
        self.current_action = Some(name.to_string());
        self.transition(GameLoopState::PerformAction, presenter);
        Ok(true)
    }

    /// The player asked for the next line of whatever dialogue is showing.
    pub fn advance_dialogue(&mut self, presenter: &mut dyn Presenter) -> DialogueStep {
        if !matches!(
            self.phase,
            GameLoopState::StartOfDayDialogues | GameLoopState::PerformAction
        ) {
            return DialogueStep::Finished;
        }

        let step = self.dialogue.advance(&mut self.state, &mut self.evaluator);
        match &step {
            DialogueStep::Line(text) => presenter.display_text(text),
            DialogueStep::Finished => presenter.clear_text(),
        }
        step
    }

    /// The player closed the start-of-day notifications; skip the rest.
    pub fn close_notifications(&mut self, presenter: &mut dyn Presenter) {
        if self.phase != GameLoopState::StartOfDayDialogues {
            return;
        }
        tracing::debug!(skipped = self.pending.len(), "Start-of-day notifications closed");
        self.pending.clear();
        self.dialogue.stop();
        presenter.clear_text();
    }

    fn transition(&mut self, next: GameLoopState, presenter: &mut dyn Presenter) {
        if next == self.phase {
            return;
        }
        tracing::debug!(from = ?self.phase, to = ?next, day = self.state.day(), "Game loop transition");
        self.phase = next;

        match next {
            GameLoopState::ActivitiesSelection => {
                presenter.display_text(&self.config.activities_prompt);
                self.refresh_interactables(presenter);
            }
            GameLoopState::GameEnd => {
                for action in &self.content.actions {
                    presenter.set_interactable(&action.name, false);
                }
            }
            _ => {}
        }
    }

    fn setup(&mut self) {
        self.state.reset(&self.config);
        self.dialogue.stop();
        self.pending.clear();
        self.current_action = None;

        if let Some(preset) = self.content.presets.choose(&mut self.rng) {
            self.state.apply_preset(preset);
        }
        self.state.stats.set(stat_names::DAY, 1);
    }

    fn start_day(&mut self) {
        self.new_day.set(false);

        self.events
            .evaluate(&self.content.start_of_day_events, &mut self.state, &mut self.evaluator);

        self.pending = self
            .content
            .start_of_day_dialogues
            .iter()
            .filter(|dialogue| self.evaluator.evaluate(&self.state, &dialogue.condition))
            .cloned()
            .collect();
        tracing::debug!(day = self.state.day(), queued = self.pending.len(), "Day started");
    }

    fn play_notifications(&mut self, presenter: &mut dyn Presenter) -> GameLoopState {
        if !self.dialogue.is_finished() {
            return GameLoopState::StartOfDayDialogues;
        }

        match self
            .dialogue
            .play_first_possible(&self.pending, &mut self.state, &mut self.evaluator)
        {
            Some(index) => {
                self.pending.remove(index);
                self.show_current_line(presenter);
                GameLoopState::StartOfDayDialogues
            }
            None => {
                self.pending.clear();
                // A start-of-day script may have ended the game.
                if self.state.is_game_over() {
                    GameLoopState::GameEnd
                } else {
                    GameLoopState::ActivitiesSelection
                }
            }
        }
    }

    fn finish_action(&mut self) -> GameLoopState {
        if !self.dialogue.is_finished() {
            return GameLoopState::PerformAction;
        }

        if let Some(name) = self.current_action.take() {
            self.expose(&name);
        }

        if self.state.is_game_over() || self.state.day() > self.config.last_day {
            self.state.end_game(DEFAULT_ENDING);
            GameLoopState::GameEnd
        } else if self.new_day.get() {
            GameLoopState::StartOfDayEvents
        } else {
            GameLoopState::ActivitiesSelection
        }
    }

    /// Run the infection collaborator for a finished risky action.
    fn expose(&mut self, name: &str) {
        let Some(action) = self.content.action(name) else {
            return;
        };
        if !action.is_risky() {
            return;
        }

        let params = &self.config.infection;
        let mut susceptibility = if self.state.flags.get(flag_names::IS_IMMUNOCOMPROMISED) {
            params.immunocompromised_susceptibility
        } else {
            params.base_susceptibility
        };
        if self.state.flags.get(flag_names::HAS_MASK) {
            susceptibility *= params.mask_factor;
        }

        let currently_infected = self.state.flags.get(flag_names::HAS_COVID);
        let exposure = Exposure {
            currently_infected,
            susceptibility,
            risk_factor: action.risk_factor,
            participant_count: action.participant_count,
        };
        let result = self.infection.simulate(&exposure, &mut self.rng);
        tracing::debug!(
            action = %name,
            infected = result.is_infected,
            newly_infected = result.newly_infected,
            "Exposure simulated"
        );

        if result.is_infected && !currently_infected {
            self.state.flags.set(flag_names::HAS_COVID, true);
            self.state.record_infection_source(name);
        }
        if result.newly_infected > 0 {
            let total = self.state.stats.get(stat_names::NUM_INFECTED);
            self.state.stats.set(
                stat_names::NUM_INFECTED,
                total.saturating_add(i64::from(result.newly_infected)),
            );
        }
    }

    fn refresh_interactables(&mut self, presenter: &mut dyn Presenter) {
        for action in &self.content.actions {
            let enabled = self.evaluator.evaluate(&self.state, &action.enabled_condition);
            presenter.set_interactable(&action.name, enabled);
        }
        self.dirty.set(false);
    }

    fn show_current_line(&self, presenter: &mut dyn Presenter) {
        if let Some(text) = self.dialogue.displayed_text() {
            presenter.display_text(text);
        }
    }
}
