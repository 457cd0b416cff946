use crate::source::{DataSource, SourceError};
use colsnap_common::SourceId;
use std::collections::HashMap;

/// Owns every data source of a session.
///
/// Lookups are by id or by unique name; iteration follows insertion order.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: HashMap<SourceId, DataSource>,
    names: HashMap<String, SourceId>,
    order: Vec<SourceId>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a source. Names must be unique.
    pub fn insert(&mut self, source: DataSource) -> Result<SourceId, SourceError> {
        if self.names.contains_key(source.name()) {
            return Err(SourceError::DuplicateName(source.name().to_string()));
        }
        let id = source.id();
        tracing::debug!(source = source.name(), id = %id.short(), "registered data source");
        self.names.insert(source.name().to_string(), id);
        self.order.push(id);
        self.sources.insert(id, source);
        Ok(id)
    }

    /// Remove a source, handing it back to the caller.
    pub fn remove(&mut self, id: SourceId) -> Option<DataSource> {
        let source = self.sources.remove(&id)?;
        self.names.remove(source.name());
        self.order.retain(|o| *o != id);
        Some(source)
    }

    pub fn get(&self, id: SourceId) -> Option<&DataSource> {
        self.sources.get(&id)
    }

    pub fn get_mut(&mut self, id: SourceId) -> Option<&mut DataSource> {
        self.sources.get_mut(&id)
    }

    pub fn by_name(&self, name: &str) -> Option<&DataSource> {
        self.names.get(name).and_then(|id| self.sources.get(id))
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut DataSource> {
        let id = *self.names.get(name)?;
        self.sources.get_mut(&id)
    }

    /// Resolve a configured source name to its id.
    pub fn resolve(&self, name: &str) -> Result<SourceId, SourceError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SourceError::UnknownSource(name.to_string()))
    }

    /// Source ids in insertion order.
    pub fn ids(&self) -> &[SourceId] {
        &self.order
    }

    /// Sources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DataSource> {
        self.order.iter().filter_map(|id| self.sources.get(id))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
