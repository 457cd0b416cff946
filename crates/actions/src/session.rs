use crate::action::ToolAction;
use crate::checkpoint::{checkpoint, restore};
use crate::clear::clear;
use crate::report::{ActionError, ActionReport};
use crate::toolbar::{ToolConfig, Toolbar};
use colsnap_common::SourceId;
use colsnap_history::HistoryTable;
use colsnap_source::{DataSource, SourceRegistry};

/// Sources, their history and the configured toolbar of one tool instance.
///
/// Activations run to completion one at a time; debouncing rapid repeated
/// triggers is up to the host.
#[derive(Debug, Default)]
pub struct Session {
    sources: SourceRegistry,
    history: HistoryTable,
    toolbar: Toolbar,
}

impl Session {
    pub fn new(sources: SourceRegistry, toolbar: Toolbar) -> Self {
        Self {
            sources,
            history: HistoryTable::new(),
            toolbar,
        }
    }

    /// Build a session, resolving the configured target names.
    pub fn from_config(sources: SourceRegistry, config: &ToolConfig) -> Result<Self, ActionError> {
        let toolbar = Toolbar::from_config(config, &sources)?;
        Ok(Self::new(sources, toolbar))
    }

    /// Run one action against its configured targets.
    pub fn activate(&mut self, action: ToolAction) -> ActionReport {
        let targets = self.toolbar.targets(action);
        match action {
            ToolAction::Checkpoint => checkpoint(&self.sources, &mut self.history, targets),
            ToolAction::Restore => restore(&mut self.sources, &mut self.history, targets),
            ToolAction::Clear => clear(&mut self.sources, targets),
        }
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut SourceRegistry {
        &mut self.sources
    }

    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    /// Remove a source along with its history. Toolbar entries that still
    /// name it fail with a configuration error on the next activation.
    pub fn remove_source(&mut self, id: SourceId) -> Option<DataSource> {
        self.history.detach(id);
        self.sources.remove(id)
    }
}
