use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three user-facing snapshot actions.
///
/// A toolbar button, key binding or script step resolves to one of these;
/// the session never sees the raw trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAction {
    /// Save the current data of each target onto its history.
    Checkpoint,
    /// Roll each target back to its most recent checkpoint.
    Restore,
    /// Empty every column of each target.
    Clear,
}

impl ToolAction {
    pub const ALL: [ToolAction; 3] = [Self::Checkpoint, Self::Restore, Self::Clear];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkpoint => "checkpoint",
            Self::Restore => "restore",
            Self::Clear => "clear",
        }
    }

    /// Whether a successful run raises change notifications.
    pub fn notifies(&self) -> bool {
        !matches!(self, Self::Checkpoint)
    }
}

impl fmt::Display for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown action `{0}` (expected checkpoint, restore or clear)")]
pub struct ParseActionError(String);

impl FromStr for ToolAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(
            "checkpoint".parse::<ToolAction>().unwrap(),
            ToolAction::Checkpoint
        );
        assert_eq!(
            " Restore ".parse::<ToolAction>().unwrap(),
            ToolAction::Restore
        );
        assert_eq!("CLEAR".parse::<ToolAction>().unwrap(), ToolAction::Clear);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "redo".parse::<ToolAction>().unwrap_err();
        assert!(err.to_string().contains("redo"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for action in ToolAction::ALL {
            assert_eq!(action.to_string().parse::<ToolAction>().unwrap(), action);
        }
    }

    #[test]
    fn only_checkpoint_is_silent() {
        assert!(!ToolAction::Checkpoint.notifies());
        assert!(ToolAction::Restore.notifies());
        assert!(ToolAction::Clear.notifies());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ToolAction::Checkpoint).unwrap();
        assert_eq!(json, "\"checkpoint\"");
    }
}
