use crate::action::ToolAction;
use crate::report::ActionError;
use colsnap_common::SourceId;
use colsnap_source::SourceRegistry;
use serde::{Deserialize, Serialize};

/// Target source names for each action, as written in a session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub checkpoint: Vec<String>,
    pub restore: Vec<String>,
    pub clear: Vec<String>,
}

impl ToolConfig {
    /// The same targets for all three actions.
    pub fn uniform<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            checkpoint: names.clone(),
            restore: names.clone(),
            clear: names,
        }
    }

    pub fn targets(&self, action: ToolAction) -> &[String] {
        match action {
            ToolAction::Checkpoint => &self.checkpoint,
            ToolAction::Restore => &self.restore,
            ToolAction::Clear => &self.clear,
        }
    }
}

/// Resolved targets for each action.
///
/// Names are resolved once, when the toolbar is built. Each activation
/// still checks that the sources exist.
#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    checkpoint: Vec<SourceId>,
    restore: Vec<SourceId>,
    clear: Vec<SourceId>,
}

impl Toolbar {
    pub fn new(checkpoint: Vec<SourceId>, restore: Vec<SourceId>, clear: Vec<SourceId>) -> Self {
        Self {
            checkpoint,
            restore,
            clear,
        }
    }

    /// Resolve every configured name against the registry.
    pub fn from_config(config: &ToolConfig, sources: &SourceRegistry) -> Result<Self, ActionError> {
        let resolve = |action: ToolAction| -> Result<Vec<SourceId>, ActionError> {
            config
                .targets(action)
                .iter()
                .map(|name| sources.resolve(name).map_err(ActionError::from))
                .collect()
        };
        Ok(Self {
            checkpoint: resolve(ToolAction::Checkpoint)?,
            restore: resolve(ToolAction::Restore)?,
            clear: resolve(ToolAction::Clear)?,
        })
    }

    pub fn targets(&self, action: ToolAction) -> &[SourceId] {
        match action {
            ToolAction::Checkpoint => &self.checkpoint,
            ToolAction::Restore => &self.restore,
            ToolAction::Clear => &self.clear,
        }
    }
}
