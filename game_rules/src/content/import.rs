//! Importer for the tab-separated action sheet designers author content in.
//!
//! Columns, in order: category, name, description, enabled condition,
//! dialogue condition, message, message condition, commands. The first row is a
//! header. A row with both a category and a name starts a new action; a
//! non-empty dialogue condition starts a new dialogue (`-` means unconditional);
//! any of the last three cells appends a line to the current dialogue. Empty
//! cells leave the current value alone, so one action spans many rows.

use thiserror::Error;

use super::{Action, Dialogue, Line};

const COLUMN_COUNT: usize = 8;

/// Marker in the dialogue-condition column for a dialogue without a condition.
pub const UNCONDITIONAL_DIALOGUE: &str = "-";

/// Errors raised while importing an action sheet. Row numbers are 1-based and
/// count the header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("row {row}: expected at most 8 columns, found {found}")]
    TooManyColumns { row: usize, found: usize },
    #[error("row {row}: content appears before any action is named")]
    NoCurrentAction { row: usize },
    #[error("row {row}: dialogue line appears before any dialogue condition")]
    NoCurrentDialogue { row: usize },
    #[error("row {row}: action '{name}' is defined twice")]
    DuplicateAction { row: usize, name: String },
}

/// Parse an action sheet into actions, in sheet order.
pub fn import_actions_tsv(text: &str) -> Result<Vec<Action>, ImportError> {
    let mut actions: Vec<Action> = Vec::new();

    for (index, raw) in text.lines().enumerate().skip(1) {
        let row = index + 1;
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() {
            continue;
        }

        let mut cells: Vec<&str> = raw.split('\t').map(str::trim).collect();
        if cells.len() > COLUMN_COUNT {
            return Err(ImportError::TooManyColumns {
                row,
                found: cells.len(),
            });
        }
        cells.resize(COLUMN_COUNT, "");

        let (category, name) = (cells[0], cells[1]);
        if !category.is_empty() && !name.is_empty() {
            if actions.iter().any(|a| a.name == name) {
                return Err(ImportError::DuplicateAction {
                    row,
                    name: name.to_string(),
                });
            }
            actions.push(Action::new(name).with_category(category));
        }

        let rest_is_empty = cells[2..].iter().all(|c| c.is_empty());
        if rest_is_empty {
            continue;
        }
        let action = actions
            .last_mut()
            .ok_or(ImportError::NoCurrentAction { row })?;

        if !cells[2].is_empty() {
            action.description = cells[2].to_string();
        }
        if !cells[3].is_empty() {
            action.enabled_condition = cells[3].to_string();
        }

        let dialogue_condition = cells[4];
        if !dialogue_condition.is_empty() {
            let condition = if dialogue_condition == UNCONDITIONAL_DIALOGUE {
                ""
            } else {
                dialogue_condition
            };
            action
                .dialogues
                .push(Dialogue::default().with_condition(condition));
        }

        let (message, message_condition, commands) = (cells[5], cells[6], cells[7]);
        if !message.is_empty() || !message_condition.is_empty() || !commands.is_empty() {
            let dialogue = action
                .dialogues
                .last_mut()
                .ok_or(ImportError::NoCurrentDialogue { row })?;
            dialogue.lines.push(
                Line::new(message)
                    .with_condition(message_condition)
                    .with_commands(commands),
            );
        }
    }

    tracing::debug!(actions = actions.len(), "Imported action sheet");
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Category\tName\tDescription\tEnabled\tDialogue Condition\tMessage\tMessage Condition\tCommands";

    fn sheet(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_import_single_action() {
        let text = sheet(&[
            "Work\tOffice shift\tWork at the office.\tjobType==1\t-\tYou head to work.\t\ttime+480;money+120",
            "\t\t\t\t\tYour boss is happy.\tstress<50\t",
        ]);

        let actions = import_actions_tsv(&text).unwrap();

        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.category, "Work");
        assert_eq!(action.name, "Office shift");
        assert_eq!(action.enabled_condition, "jobType==1");
        assert_eq!(action.dialogues.len(), 1);
        assert!(action.dialogues[0].condition.is_empty());
        assert_eq!(action.dialogues[0].lines.len(), 2);
        assert_eq!(action.dialogues[0].lines[0].commands, "time+480;money+120");
        assert_eq!(action.dialogues[0].lines[1].condition, "stress<50");
    }

    #[test]
    fn test_import_multiple_dialogues_and_actions() {
        let text = sheet(&[
            "Food\tEat\tHave a meal.\tfood>0\tfood>2\tA proper meal.\t\tfood-1;hunger-40",
            "\t\t\t\t-\tJust a snack.\t\thunger-10",
            "Rest\tSleep\tGo to bed.",
            "\t\t\t\t-\tGood night.\t\ttime+480",
        ]);

        let actions = import_actions_tsv(&text).unwrap();

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].dialogues.len(), 2);
        assert_eq!(actions[0].dialogues[0].condition, "food>2");
        assert_eq!(actions[1].description, "Go to bed.");
        assert_eq!(actions[1].dialogues[0].lines[0].message, "Good night.");
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let text = sheet(&["", "Rest\tNap\t\t\t-\tZzz.\t\t", "   "]);
        assert_eq!(import_actions_tsv(&text).unwrap().len(), 1);
    }

    #[test]
    fn test_line_without_dialogue() {
        let text = sheet(&["Rest\tNap\t\t\t\tZzz.\t\t"]);
        assert_eq!(
            import_actions_tsv(&text),
            Err(ImportError::NoCurrentDialogue { row: 2 })
        );
    }

    #[test]
    fn test_content_without_action() {
        let text = sheet(&["\t\tOrphan description"]);
        assert_eq!(
            import_actions_tsv(&text),
            Err(ImportError::NoCurrentAction { row: 2 })
        );
    }

    #[test]
    fn test_duplicate_action() {
        let text = sheet(&["Rest\tNap", "Rest\tNap"]);
        assert!(matches!(
            import_actions_tsv(&text),
            Err(ImportError::DuplicateAction { row: 3, .. })
        ));
    }

    #[test]
    fn test_too_many_columns() {
        let text = sheet(&["a\tb\tc\td\te\tf\tg\th\ti"]);
        assert_eq!(
            import_actions_tsv(&text),
            Err(ImportError::TooManyColumns { row: 2, found: 9 })
        );
    }
}
