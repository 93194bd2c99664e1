//! Game state management - the stores every script reads and writes.

mod flags;
mod observer;
mod stats;

pub use flags::*;
pub use observer::*;
pub use stats::*;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::content::CharacterPreset;
use crate::mechanics::format_clock;

/// Names of the stats the game logic itself depends on.
pub mod stat_names {
    pub const DAY: &str = "day";
    /// Minutes since midnight.
    pub const TIME: &str = "time";
    pub const MONEY: &str = "money";
    pub const ENERGY: &str = "energy";
    pub const FOOD: &str = "food";
    pub const HUNGER: &str = "hunger";
    pub const STRESS: &str = "stress";
    pub const MEDICINE: &str = "medicine";
    pub const JOB_TYPE: &str = "jobType";
    pub const TIME_WORKED: &str = "timeWorked";
    pub const NUM_INFECTED: &str = "numInfected";
}

/// Names of the flags the game logic itself depends on.
pub mod flag_names {
    pub const HAS_COVID: &str = "hasCovid";
    pub const HAS_MASK: &str = "hasMask";
    pub const HAS_CAR: &str = "hasCar";
    pub const IS_IMMUNOCOMPROMISED: &str = "isImmunocompromised";
    pub const HAS_DEPRESSION: &str = "hasDepression";
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Index of the ending text to show.
    pub ending: u32,
}

/// The complete mutable state of a play-through.
#[derive(Debug, Default)]
pub struct GameState {
    pub stats: StatStore,
    pub flags: FlagStore,
    outcome: Option<GameOutcome>,
    infection_source: Option<String>,
}

impl GameState {
    /// Create an empty game state with no registered stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game state with the configured stats registered.
    pub fn from_config(config: &GameConfig) -> Self {
        let mut state = Self::new();
        state.reset(config);
        state
    }

    /// Clear all stats, flags and the recorded outcome, then register the
    /// configured stats again. Subscriptions survive the reset.
    pub fn reset(&mut self, config: &GameConfig) {
        self.stats.unregister_all();
        self.flags.clear();
        self.outcome = None;
        self.infection_source = None;

        for definition in &config.stats {
            self.stats
                .register(definition.name.clone(), definition.initial, definition.bounds());
        }
        tracing::debug!(stats = config.stats.len(), "Game state reset");
    }

    /// Apply a character preset's starting values.
    pub fn apply_preset(&mut self, preset: &CharacterPreset) {
        self.stats.set(stat_names::MONEY, preset.starting_money);
        self.stats.set(stat_names::JOB_TYPE, preset.starting_job);
        self.flags.set(flag_names::HAS_CAR, preset.has_car);
        self.flags
            .set(flag_names::IS_IMMUNOCOMPROMISED, preset.is_immunocompromised);
        self.flags.set(flag_names::HAS_DEPRESSION, preset.has_depression);
        tracing::debug!(preset = %preset.name, "Applied character preset");
    }

    /// Current day number.
    pub fn day(&self) -> i64 {
        self.stats.get(stat_names::DAY)
    }

    /// Current time of day as `HH:MM`.
    pub fn clock(&self) -> String {
        format_clock(self.stats.get(stat_names::TIME))
    }

    /// Record the end of the game. The first recorded outcome wins.
    pub fn end_game(&mut self, ending: u32) {
        if self.outcome.is_none() {
            tracing::debug!(ending, "Game outcome recorded");
            self.outcome = Some(GameOutcome { ending });
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Remember which action first infected the player.
    pub fn record_infection_source(&mut self, action: &str) {
        if self.infection_source.is_none() {
            self.infection_source = Some(action.to_string());
        }
    }

    pub fn infection_source(&self) -> Option<&str> {
        self.infection_source.as_deref()
    }
}
