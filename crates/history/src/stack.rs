use crate::snapshot::Snapshot;
use colsnap_common::SourceId;
use std::collections::HashMap;

/// LIFO stack of snapshots for one source. The last pushed is the first
/// restored.
#[derive(Debug, Default)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push onto the top. Returns the new depth.
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        self.entries.push(snapshot);
        self.entries.len()
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    /// Most recent snapshot, without removing it.
    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }
}

/// Side table of history stacks, keyed by source id.
///
/// Sources carry no history field of their own; a stack is attached here
/// on the first checkpoint and lives until the source is detached.
/// Stacks are unbounded.
#[derive(Debug, Default)]
pub struct HistoryTable {
    stacks: HashMap<SourceId, HistoryStack>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack for `id`, creating an empty one if none is attached yet.
    pub fn attach(&mut self, id: SourceId) -> &mut HistoryStack {
        self.stacks.entry(id).or_insert_with(|| {
            tracing::debug!(source = %id.short(), "attached history stack");
            HistoryStack::new()
        })
    }

    /// Push a snapshot for `id`, attaching a stack first if needed.
    /// Returns the new depth.
    pub fn push(&mut self, id: SourceId, snapshot: Snapshot) -> usize {
        self.attach(id).push(snapshot)
    }

    /// Pop the most recent snapshot. `None` when no stack is attached or
    /// the stack is empty.
    pub fn pop(&mut self, id: SourceId) -> Option<Snapshot> {
        self.stacks.get_mut(&id)?.pop()
    }

    pub fn get(&self, id: SourceId) -> Option<&HistoryStack> {
        self.stacks.get(&id)
    }

    /// Number of snapshots held for `id`; zero when nothing is attached.
    pub fn depth(&self, id: SourceId) -> usize {
        self.stacks.get(&id).map_or(0, HistoryStack::len)
    }

    pub fn is_attached(&self, id: SourceId) -> bool {
        self.stacks.contains_key(&id)
    }

    /// Drop the stack of a source that is going away.
    pub fn detach(&mut self, id: SourceId) -> Option<HistoryStack> {
        self.stacks.remove(&id)
    }

    /// Number of sources with an attached stack.
    pub fn attached_count(&self) -> usize {
        self.stacks.len()
    }

    /// Snapshots held across all sources.
    pub fn total_snapshots(&self) -> usize {
        self.stacks.values().map(HistoryStack::len).sum()
    }
}
