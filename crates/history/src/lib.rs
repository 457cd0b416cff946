//! History: column deep-copy, snapshots, per-source LIFO stacks.
//!
//! # Invariants
//! - A snapshot shares no bulk buffer with live data or with another snapshot.
//! - Uncopyable buffers are an error, never aliased.
//! - Stacks live in a side table keyed by source id, created on first push.

pub mod copy;
pub mod snapshot;
pub mod stack;

pub use copy::{CopyError, capture_columns, deep_copy_column};
pub use snapshot::Snapshot;
pub use stack::{HistoryStack, HistoryTable};
