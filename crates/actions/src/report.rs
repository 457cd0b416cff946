use crate::action::ToolAction;
use colsnap_common::SourceId;
use colsnap_history::CopyError;
use colsnap_source::SourceError;
use std::fmt;

/// Why an action failed for one source.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// The target reference is invalid or the source lacks required structure.
    #[error("configuration error: {0}")]
    Config(#[from] SourceError),
    /// A column could not be duplicated for the snapshot.
    #[error("snapshot failed: {0}")]
    Copy(#[from] CopyError),
    /// The data was replaced but one or more observers failed.
    #[error("notification failed: {0}")]
    Notify(SourceError),
}

/// What happened to one target source.
#[derive(Debug)]
pub enum SourceOutcome {
    /// A snapshot was pushed; `depth` is the new history depth.
    Checkpointed { depth: usize },
    /// The latest snapshot became live data; `remaining` snapshots are left.
    Restored { remaining: usize },
    /// Restore found no history for this source.
    Skipped,
    /// `columns` columns were emptied.
    Cleared { columns: usize },
    Failed(ActionError),
}

impl SourceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether the source's live data was replaced, even if an observer
    /// then failed.
    pub fn replaced_data(&self) -> bool {
        matches!(
            self,
            Self::Restored { .. } | Self::Cleared { .. } | Self::Failed(ActionError::Notify(_))
        )
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkpointed { depth } => write!(f, "checkpointed (depth {depth})"),
            Self::Restored { remaining } => write!(f, "restored ({remaining} left)"),
            Self::Skipped => f.write_str("skipped (no history)"),
            Self::Cleared { columns } => write!(f, "cleared {columns} column(s)"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

#[derive(Debug)]
pub struct ReportEntry {
    pub source: SourceId,
    pub outcome: SourceOutcome,
}

/// Per-source results of one action invocation, in target order.
#[derive(Debug)]
pub struct ActionReport {
    action: ToolAction,
    entries: Vec<ReportEntry>,
}

impl ActionReport {
    pub fn new(action: ToolAction) -> Self {
        Self {
            action,
            entries: Vec::new(),
        }
    }

    /// Record the result for one source, logging failures as they happen.
    pub fn record(&mut self, source: SourceId, result: Result<SourceOutcome, ActionError>) {
        let outcome = match result {
            Ok(outcome) => {
                tracing::debug!(
                    action = %self.action,
                    source = %source.short(),
                    %outcome,
                    "processed source"
                );
                outcome
            }
            Err(err) => {
                tracing::warn!(
                    action = %self.action,
                    source = %source.short(),
                    error = %err,
                    "action failed for source"
                );
                SourceOutcome::Failed(err)
            }
        };
        self.entries.push(ReportEntry { source, outcome });
    }

    pub fn action(&self) -> ToolAction {
        self.action
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Outcome for a given source, if it was a target.
    pub fn outcome(&self, source: SourceId) -> Option<&SourceOutcome> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| &e.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = (SourceId, &ActionError)> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            SourceOutcome::Failed(err) => Some((e.source, err)),
            _ => None,
        })
    }

    /// Sources whose observers were sent change notifications.
    pub fn notified(&self) -> impl Iterator<Item = SourceId> + '_ {
        let notifies = self.action.notifies();
        self.entries
            .iter()
            .filter(move |e| notifies && e.outcome.replaced_data())
            .map(|e| e.source)
    }

    pub fn is_success(&self) -> bool {
        !self.entries.iter().any(|e| e.outcome.is_failure())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn finish(self) -> Self {
        tracing::info!(
            action = %self.action,
            targets = self.entries.len(),
            failed = self.failures().count(),
            notified = self.notified().count(),
            "action complete"
        );
        self
    }
}

impl fmt::Display for ActionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} target(s)", self.action, self.entries.len())?;
        for entry in &self.entries {
            write!(f, "\n  [{}] {}", entry.source.short(), entry.outcome)?;
        }
        Ok(())
    }
}
