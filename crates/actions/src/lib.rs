//! Snapshot actions: checkpoint, restore and clear over data sources.
//!
//! # Invariants
//! - History only grows through checkpoint and only shrinks through restore.
//! - Clear never touches history.
//! - Restore and clear notify each affected source exactly once (generic
//!   event, then property event); checkpoint never notifies.
//! - Targets are processed in configured order and independently: a failure
//!   on one source neither stops nor rolls back the others.

pub mod action;
pub mod checkpoint;
pub mod clear;
pub mod inspector;
pub mod report;
pub mod session;
pub mod toolbar;

pub use action::{ParseActionError, ToolAction};
pub use checkpoint::{checkpoint, restore};
pub use clear::clear;
pub use inspector::{SessionInspector, SourceSummary};
pub use report::{ActionError, ActionReport, ReportEntry, SourceOutcome};
pub use session::Session;
pub use toolbar::{ToolConfig, Toolbar};
