use colsnap_common::{Column, ColumnData, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the property announced by the property-level notification.
pub const DATA_PROPERTY: &str = "data";

/// Errors raised by data sources and the registry.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data source `{0}` has no data mapping")]
    MissingData(String),
    #[error("unknown data source `{0}`")]
    UnknownSource(String),
    #[error("data source {0} not found")]
    NotFound(SourceId),
    #[error("a data source named `{0}` already exists")]
    DuplicateName(String),
    #[error("{} observer(s) of `{name}` failed: {}", .failures.len(), .failures.join("; "))]
    Observer { name: String, failures: Vec<String> },
}

/// A notification raised on a data source after its live data changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// Coarse-grained "something changed" event.
    DataChanged { source: SourceId },
    /// A named property of the source was replaced.
    PropertyChanged { source: SourceId, property: String },
}

/// Independent subscription channels of a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Receives every [`ChangeEvent::DataChanged`].
    Change,
    /// Receives [`ChangeEvent::PropertyChanged`] for one property name.
    Property(String),
}

impl Channel {
    fn accepts(&self, event: &ChangeEvent) -> bool {
        match (self, event) {
            (Self::Change, ChangeEvent::DataChanged { .. }) => true,
            (Self::Property(wanted), ChangeEvent::PropertyChanged { property, .. }) => {
                wanted == property
            }
            _ => false,
        }
    }
}

/// Handle returned by [`DataSource::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ChangeEvent) -> Result<(), String>>;

struct Subscriber {
    id: SubscriptionId,
    channel: Channel,
    callback: Callback,
}

/// An observable table of named columns.
///
/// `data` is `None` for a source that was registered without a data
/// mapping; operations that read live data reject such a source.
pub struct DataSource {
    id: SourceId,
    name: String,
    data: Option<ColumnData>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    /// Every notification raised, in emission order.
    event_log: Vec<ChangeEvent>,
}

impl DataSource {
    /// Create a source holding the given columns.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            id: SourceId::new(),
            name: name.into(),
            data: Some(data),
            subscribers: Vec::new(),
            next_subscription: 0,
            event_log: Vec::new(),
        }
    }

    /// Create a source with no data mapping attached.
    pub fn without_data(name: impl Into<String>) -> Self {
        Self {
            data: None,
            ..Self::new(name, ColumnData::new())
        }
    }

    /// Builder-style column insertion, used when assembling sources.
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.data
            .get_or_insert_with(ColumnData::new)
            .insert(name.into(), column.into());
        self
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Live column data, if a mapping is attached.
    pub fn data(&self) -> Option<&ColumnData> {
        self.data.as_ref()
    }

    /// Live column data, or [`SourceError::MissingData`].
    pub fn require_data(&self) -> Result<&ColumnData, SourceError> {
        self.data
            .as_ref()
            .ok_or_else(|| SourceError::MissingData(self.name.clone()))
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.data.as_ref()?.get(name)
    }

    /// Mutable access to one live column. Does not notify.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.data.as_mut()?.get_mut(name)
    }

    /// Insert or overwrite one live column, returning the previous one.
    /// Does not notify.
    pub fn set_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<Option<Column>, SourceError> {
        let data = self
            .data
            .as_mut()
            .ok_or_else(|| SourceError::MissingData(self.name.clone()))?;
        Ok(data.insert(name.into(), column))
    }

    /// Replace the live data wholesale, taking ownership of `data`.
    ///
    /// Returns the previous mapping. Observers are not informed; callers
    /// follow up with [`DataSource::notify`].
    pub fn replace_data(&mut self, data: ColumnData) -> Option<ColumnData> {
        self.data.replace(data)
    }

    /// Register a callback on one channel.
    pub fn subscribe<F>(&mut self, channel: Channel, callback: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) -> Result<(), String> + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            channel,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Announce that the live data was replaced.
    ///
    /// Raises [`ChangeEvent::DataChanged`] on the change channel, then
    /// [`ChangeEvent::PropertyChanged`] for `data` on the property channel.
    /// Every subscriber is called even if an earlier one fails; failures
    /// are reported together afterwards.
    pub fn notify(&mut self) -> Result<(), SourceError> {
        let events = [
            ChangeEvent::DataChanged { source: self.id },
            ChangeEvent::PropertyChanged {
                source: self.id,
                property: DATA_PROPERTY.to_string(),
            },
        ];

        let mut failures = Vec::new();
        for event in events {
            for sub in self
                .subscribers
                .iter_mut()
                .filter(|s| s.channel.accepts(&event))
            {
                if let Err(reason) = (sub.callback)(&event) {
                    failures.push(reason);
                }
            }
            self.event_log.push(event);
        }

        if failures.is_empty() {
            Ok(())
        } else {
            tracing::warn!(
                source = %self.name,
                failed = failures.len(),
                "observer failures during notify"
            );
            Err(SourceError::Observer {
                name: self.name.clone(),
                failures,
            })
        }
    }

    /// Read-only access to the notification log.
    pub fn events(&self) -> &[ChangeEvent] {
        &self.event_log
    }

    /// Drain and return the notification log.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.event_log)
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("data", &self.data)
            .field("subscribers", &self.subscribers.len())
            .field("events", &self.event_log.len())
            .finish()
    }
}
