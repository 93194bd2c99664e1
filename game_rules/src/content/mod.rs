//! Authored content: dialogues, scripted events, actions, and presets.
//!
//! Content is loaded once and only read afterwards; scripts inside it change
//! the game state, never the content itself.

mod action;
mod dialogue;
mod import;

pub use action::*;
pub use dialogue::*;
pub use import::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a content bundle.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML content: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Everything a play-through needs besides configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPack {
    pub actions: Vec<Action>,
    /// Events evaluated at the start of every day.
    pub start_of_day_events: Vec<ScriptedEvent>,
    /// Dialogues queued at the start of every day when their condition holds.
    pub start_of_day_dialogues: Vec<Dialogue>,
    pub presets: Vec<CharacterPreset>,
}

impl ContentPack {
    /// Create an empty content pack.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ContentError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a bundle, picking the format from the file extension (`.toml`,
    /// otherwise JSON).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }

    /// Replace the action list with the contents of an action sheet.
    pub fn with_actions_tsv(mut self, text: &str) -> Result<Self, ContentError> {
        self.actions = import_actions_tsv(text)?;
        Ok(self)
    }

    /// Find an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.name == name)
    }
}
