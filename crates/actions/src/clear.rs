use crate::action::ToolAction;
use crate::report::{ActionError, ActionReport, SourceOutcome};
use colsnap_common::{ColumnData, SourceId};
use colsnap_source::{SourceError, SourceRegistry};

/// Empty every column of each target, keeping column names.
///
/// History is not consulted or changed; the only way back is a restore of
/// an earlier checkpoint.
pub fn clear(sources: &mut SourceRegistry, targets: &[SourceId]) -> ActionReport {
    let mut report = ActionReport::new(ToolAction::Clear);
    for &id in targets {
        report.record(id, clear_one(sources, id));
    }
    report.finish()
}

fn clear_one(sources: &mut SourceRegistry, id: SourceId) -> Result<SourceOutcome, ActionError> {
    let source = sources.get_mut(id).ok_or(SourceError::NotFound(id))?;
    let emptied: ColumnData = source
        .require_data()?
        .iter()
        .map(|(name, column)| (name.clone(), column.emptied()))
        .collect();
    let columns = emptied.len();
    source.replace_data(emptied);
    source.notify().map_err(ActionError::Notify)?;
    Ok(SourceOutcome::Cleared { columns })
}
