use crate::action::ToolAction;
use crate::report::{ActionError, ActionReport, SourceOutcome};
use colsnap_common::SourceId;
use colsnap_history::{HistoryTable, Snapshot};
use colsnap_source::{SourceError, SourceRegistry};

/// Push a deep copy of each target's live data onto its history.
///
/// Live data is not changed, so no notification is raised. A target
/// without data, or with a column that cannot be duplicated, fails on its
/// own; the remaining targets are still checkpointed.
pub fn checkpoint(
    sources: &SourceRegistry,
    history: &mut HistoryTable,
    targets: &[SourceId],
) -> ActionReport {
    let mut report = ActionReport::new(ToolAction::Checkpoint);
    for &id in targets {
        report.record(id, checkpoint_one(sources, history, id));
    }
    report.finish()
}

fn checkpoint_one(
    sources: &SourceRegistry,
    history: &mut HistoryTable,
    id: SourceId,
) -> Result<SourceOutcome, ActionError> {
    let source = sources.get(id).ok_or(SourceError::NotFound(id))?;
    let data = source.require_data()?;
    history.attach(id);
    let snapshot = Snapshot::capture(data)?;
    let depth = history.push(id, snapshot);
    Ok(SourceOutcome::Checkpointed { depth })
}

/// Pop each target's most recent snapshot and make it the live data.
///
/// A target with no history is skipped. The popped snapshot is consumed:
/// its columns move into the source and cannot be restored again.
pub fn restore(
    sources: &mut SourceRegistry,
    history: &mut HistoryTable,
    targets: &[SourceId],
) -> ActionReport {
    let mut report = ActionReport::new(ToolAction::Restore);
    for &id in targets {
        report.record(id, restore_one(sources, history, id));
    }
    report.finish()
}

fn restore_one(
    sources: &mut SourceRegistry,
    history: &mut HistoryTable,
    id: SourceId,
) -> Result<SourceOutcome, ActionError> {
    let source = sources.get_mut(id).ok_or(SourceError::NotFound(id))?;
    let Some(snapshot) = history.pop(id) else {
        return Ok(SourceOutcome::Skipped);
    };
    source.replace_data(snapshot.into_data());
    // The replacement stands even if an observer fails.
    source.notify().map_err(ActionError::Notify)?;
    Ok(SourceOutcome::Restored {
        remaining: history.depth(id),
    })
}
