//! Shared value model for the snapshot/undo subsystem.
//!
//! # Invariants
//! - Every column is either a bulk buffer or a scalar, decided by
//!   [`Column::is_bulk_buffer`], never by a type hierarchy.
//! - Cloning a [`Value`] never duplicates string or opaque payloads.

pub mod column;
pub mod types;

pub use column::{Column, ColumnData, ForeignBuffer, Value};
pub use types::SourceId;
