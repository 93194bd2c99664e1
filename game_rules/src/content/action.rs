//! Player actions and character presets.

use serde::{Deserialize, Serialize};

use super::Dialogue;

/// Something the player can choose to do during the day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Action {
    /// Unique name; also the identifier reported to the presenter.
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,

    /// Condition deciding whether the action can be picked.
    #[serde(default)]
    pub enabled_condition: String,

    /// Candidate dialogues; the first playable one runs.
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,

    // Passed through to the infection model.
    #[serde(default)]
    pub risk_factor: f32,
    #[serde(default)]
    pub participant_count: u32,
}

impl Action {
    /// Create an action with no dialogues.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_enabled_condition(mut self, condition: impl Into<String>) -> Self {
        self.enabled_condition = condition.into();
        self
    }

    pub fn with_dialogue(mut self, dialogue: Dialogue) -> Self {
        self.dialogues.push(dialogue);
        self
    }

    pub fn with_risk(mut self, risk_factor: f32, participant_count: u32) -> Self {
        self.risk_factor = risk_factor;
        self.participant_count = participant_count;
        self
    }

    /// Does finishing this action expose the player to infection?
    pub fn is_risky(&self) -> bool {
        self.risk_factor != 0.0
    }
}

/// Starting conditions for a play-through.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterPreset {
    pub name: String,
    pub description: String,
    pub starting_money: i64,
    pub starting_job: i64,
    pub has_car: bool,
    pub is_immunocompromised: bool,
    pub has_depression: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_action() {
        let action = Action::new("Sleep");
        assert_eq!(action.name, "Sleep");
        assert!(action.enabled_condition.is_empty());
        assert!(!action.is_risky());
    }

    #[test]
    fn test_risky_action() {
        let action = Action::new("Go to a party").with_risk(0.4, 20);
        assert!(action.is_risky());
        assert_eq!(action.participant_count, 20);
    }
}
