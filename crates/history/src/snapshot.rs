use crate::copy::{CopyError, capture_columns};
use colsnap_common::{Column, ColumnData};

/// An independently owned copy of a source's columns at capture time.
///
/// Snapshots are never edited after capture. Restoring one moves its
/// columns into the source, so no second copy is made.
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    columns: ColumnData,
}

impl Snapshot {
    /// Deep-copy the given live data.
    pub fn capture(data: &ColumnData) -> Result<Self, CopyError> {
        Ok(Self {
            columns: capture_columns(data)?,
        })
    }

    pub fn columns(&self) -> &ColumnData {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Length of the longest column.
    pub fn row_count(&self) -> usize {
        self.columns.values().map(Column::len).max().unwrap_or(0)
    }

    /// Give up the snapshot, handing its columns to the caller.
    pub fn into_data(self) -> ColumnData {
        self.columns
    }
}
