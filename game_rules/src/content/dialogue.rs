//! Dialogue and scripted event definitions.

use serde::{Deserialize, Serialize};

/// One displayable line of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Line {
    pub message: String,
    /// Condition checked right before the line would be shown.
    #[serde(default)]
    pub condition: String,
    /// `;`-separated commands run when the line is shown.
    #[serde(default)]
    pub commands: String,
}

impl Line {
    /// Create an unconditional line with no commands.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_commands(mut self, commands: impl Into<String>) -> Self {
        self.commands = commands.into();
        self
    }
}

/// A gated, ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dialogue {
    /// Condition checked when the dialogue is asked to play.
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Dialogue {
    /// Create an unconditional dialogue.
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            condition: String::new(),
            lines,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One trigger/action pair of a scripted event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventBranch {
    pub trigger: String,
    pub action: String,
}

impl EventBranch {
    pub fn new(trigger: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            action: action.into(),
        }
    }
}

/// A world event; at most one of its branches fires per evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScriptedEvent {
    #[serde(default)]
    pub name: String,
    pub branches: Vec<EventBranch>,
}

impl ScriptedEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branches: Vec::new(),
        }
    }

    pub fn with_branch(mut self, trigger: impl Into<String>, action: impl Into<String>) -> Self {
        self.branches.push(EventBranch::new(trigger, action));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogue_builder() {
        let dialogue = Dialogue::default()
            .with_condition("hasCar")
            .with_line(Line::new("You drive to work.").with_commands("time+30"))
            .with_line(Line::new("Traffic was bad.").with_condition("@rollSuccess(0.2)"));

        assert_eq!(dialogue.condition, "hasCar");
        assert_eq!(dialogue.lines.len(), 2);
        assert_eq!(dialogue.lines[0].commands, "time+30");
        assert!(dialogue.lines[0].condition.is_empty());
    }

    #[test]
    fn test_line_fields_default_when_missing() {
        let line: Line = serde_json::from_str(r#"{ "message": "Hello" }"#).unwrap();
        assert_eq!(line, Line::new("Hello"));
    }
}
