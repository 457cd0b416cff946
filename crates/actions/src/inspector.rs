use colsnap_common::{Column, SourceId};
use colsnap_history::HistoryTable;
use colsnap_source::{DataSource, SourceRegistry};
use serde::Serialize;
use std::fmt;

/// Read-only view over a session's sources and their history, for
/// debugging and command-line output.
pub struct SessionInspector;

impl SessionInspector {
    /// Summaries of every source, in registration order.
    pub fn summary(sources: &SourceRegistry, history: &HistoryTable) -> Vec<SourceSummary> {
        sources
            .iter()
            .map(|source| SourceSummary::of(source, history))
            .collect()
    }

    pub fn inspect_source(
        sources: &SourceRegistry,
        history: &HistoryTable,
        id: SourceId,
    ) -> Option<SourceSummary> {
        sources
            .get(id)
            .map(|source| SourceSummary::of(source, history))
    }
}

/// Shape of one source plus its history depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub id: SourceId,
    pub name: String,
    pub has_data: bool,
    pub columns: Vec<String>,
    pub rows: usize,
    pub history_depth: usize,
}

impl SourceSummary {
    fn of(source: &DataSource, history: &HistoryTable) -> Self {
        let (columns, rows) = match source.data() {
            Some(data) => (
                data.keys().cloned().collect(),
                data.values().map(Column::len).max().unwrap_or(0),
            ),
            None => (Vec::new(), 0),
        };
        Self {
            id: source.id(),
            name: source.name().to_string(),
            has_data: source.data().is_some(),
            columns,
            rows,
            history_depth: history.depth(source.id()),
        }
    }
}

impl fmt::Display for SourceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_data {
            return write!(
                f,
                "Source [{}] {}: no data, history={}",
                self.id.short(),
                self.name,
                self.history_depth
            );
        }
        write!(
            f,
            "Source [{}] {}: columns=[{}] rows={} history={}",
            self.id.short(),
            self.name,
            self.columns.join(", "),
            self.rows,
            self.history_depth
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsnap_common::ColumnData;
    use colsnap_history::Snapshot;

    #[test]
    fn summary_empty_registry() {
        let summary = SessionInspector::summary(&SourceRegistry::new(), &HistoryTable::new());
        assert!(summary.is_empty());
    }

    #[test]
    fn summary_reports_shape_and_depth() {
        let mut sources = SourceRegistry::new();
        let mut history = HistoryTable::new();
        let id = sources
            .insert(
                DataSource::new("xy", ColumnData::new())
                    .with_column("x", vec![1.0_f64, 2.0])
                    .with_column("y", vec![1_i32, 2, 3]),
            )
            .unwrap();
        sources.insert(DataSource::without_data("bare")).unwrap();
        let snap = Snapshot::capture(sources.get(id).unwrap().data().unwrap()).unwrap();
        history.push(id, snap);

        let summary = SessionInspector::summary(&sources, &history);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].name, "xy");
        assert_eq!(summary[0].columns, vec!["x", "y"]);
        assert_eq!(summary[0].rows, 3);
        assert_eq!(summary[0].history_depth, 1);
        assert!(!summary[1].has_data);
        assert!(summary[1].to_string().contains("no data"));
    }

    #[test]
    fn inspect_missing_source() {
        let found = SessionInspector::inspect_source(
            &SourceRegistry::new(),
            &HistoryTable::new(),
            SourceId::new(),
        );
        assert!(found.is_none());
    }

    #[test]
    fn display_lists_columns() {
        let mut sources = SourceRegistry::new();
        let table = DataSource::new("t", ColumnData::new()).with_column("a", vec![true]);
        let id = sources.insert(table).unwrap();
        let text = SessionInspector::inspect_source(&sources, &HistoryTable::new(), id)
            .unwrap()
            .to_string();
        assert!(text.contains("columns=[a]"));
        assert!(text.contains("rows=1"));
        assert!(text.contains("history=0"));
    }
}
