//! Data sources: addressable, observable tables of named columns.
//!
//! # Invariants
//! - Live data is only replaced through explicit operations.
//! - A change notification always raises the generic event before the
//!   property-level event, and both are always raised.
//! - Source names are unique within a registry.

pub mod registry;
pub mod source;

pub use registry::SourceRegistry;
pub use source::{ChangeEvent, Channel, DATA_PROPERTY, DataSource, SourceError, SubscriptionId};
