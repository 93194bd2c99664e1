//! Game configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::world_state::{stat_names, StatBounds};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("stat '{0}' is defined more than once")]
    DuplicateStat(String),
}

/// Definition of a stat registered when the game state is reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDefinition {
    pub name: String,
    #[serde(default)]
    pub initial: i64,
    #[serde(default = "StatDefinition::default_min")]
    pub min: i64,
    #[serde(default = "StatDefinition::default_max")]
    pub max: i64,
}

impl StatDefinition {
    /// A stat with no limits.
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initial: 0,
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    /// A stat limited to `min..=max`.
    pub fn bounded(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            initial: 0,
            min,
            max,
        }
    }

    pub fn bounds(&self) -> StatBounds {
        StatBounds::new(self.min, self.max)
    }

    fn default_min() -> i64 {
        i64::MIN
    }

    fn default_max() -> i64 {
        i64::MAX
    }
}

/// Parameters for building the susceptibility passed to the infection model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfectionConfig {
    pub base_susceptibility: f32,
    pub immunocompromised_susceptibility: f32,
    /// Multiplier applied to susceptibility while the player wears a mask.
    pub mask_factor: f32,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        Self {
            base_susceptibility: 0.1,
            immunocompromised_susceptibility: 0.3,
            mask_factor: 0.5,
        }
    }
}

/// Top-level game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Stats registered on every reset.
    pub stats: Vec<StatDefinition>,

    /// The game ends once an action finishes after this day.
    pub last_day: i64,

    /// Text shown while waiting for the player to pick an action.
    pub activities_prompt: String,

    pub infection: InfectionConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stats: vec![
                StatDefinition::bounded(stat_names::DAY, 0, i64::MAX),
                StatDefinition::bounded(stat_names::TIME, 0, i64::MAX),
                StatDefinition::bounded(stat_names::MONEY, 0, i64::MAX),
                StatDefinition::bounded(stat_names::ENERGY, 0, 100),
                StatDefinition::bounded(stat_names::FOOD, 0, i64::MAX),
                StatDefinition::bounded(stat_names::HUNGER, 0, 100),
                StatDefinition::bounded(stat_names::STRESS, 0, 100),
                StatDefinition::bounded(stat_names::MEDICINE, 0, i64::MAX),
                StatDefinition::bounded(stat_names::JOB_TYPE, 0, 5),
                StatDefinition::bounded(stat_names::TIME_WORKED, 0, i64::MAX),
                StatDefinition::bounded(stat_names::NUM_INFECTED, 0, i64::MAX),
            ],
            last_day: 7,
            activities_prompt: "Choose activities for the day.".to_string(),
            infection: InfectionConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Look up a stat definition by name.
    pub fn stat(&self, name: &str) -> Option<&StatDefinition> {
        self.stats.iter().find(|s| s.name == name)
    }

    fn check(&self) -> Result<(), ConfigError> {
        for (i, stat) in self.stats.iter().enumerate() {
            if self.stats[..i].iter().any(|s| s.name == stat.name) {
                return Err(ConfigError::DuplicateStat(stat.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_registers_clock_stats() {
        let config = GameConfig::default();
        assert!(config.stat(stat_names::DAY).is_some());
        assert!(config.stat(stat_names::TIME).is_some());
        assert_eq!(config.last_day, 7);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = GameConfig::from_toml_str("last_day = 3\n").unwrap();
        assert_eq!(config.last_day, 3);
        assert_eq!(config.activities_prompt, "Choose activities for the day.");
        assert!(!config.stats.is_empty());
    }

    #[test]
    fn test_stat_definitions_from_toml() {
        let text = r#"
            [[stats]]
            name = "day"

            [[stats]]
            name = "energy"
            initial = 80
            min = 0
            max = 100

            [infection]
            mask_factor = 0.25
        "#;
        let config = GameConfig::from_toml_str(text).unwrap();

        assert_eq!(config.stats.len(), 2);
        assert_eq!(config.stats[0].bounds(), StatBounds::UNBOUNDED);
        assert_eq!(config.stats[1].initial, 80);
        assert_eq!(config.stats[1].bounds(), StatBounds::new(0, 100));
        assert_eq!(config.infection.mask_factor, 0.25);
        assert_eq!(config.infection.base_susceptibility, 0.1);
    }

    #[test]
    fn test_duplicate_stat_rejected() {
        let text = r#"
            [[stats]]
            name = "money"

            [[stats]]
            name = "money"
        "#;
        let err = GameConfig::from_toml_str(text).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateStat(name) if name == "money"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            GameConfig::from_toml_str("last_day = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
