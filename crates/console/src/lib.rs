//! Vectordeck console core.
//!
//! The file–vector-store reconciliation engine behind the management
//! console: it loads the uploaded-file list from the backend, derives which
//! vector stores contain each file (the backend never reports this
//! directly), keeps an optimistic local view consistent across
//! create/delete/batch operations, and tolerates partial failure across
//! concurrent, cancellable loads.

pub mod batch;
pub mod console;
pub mod format;
pub mod health;
pub mod membership;
pub mod placeholder;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use batch::{BatchOutcome, ItemFailure};
pub use console::Console;
pub use format::{format_bytes, format_timestamp, FileKind};
pub use health::{probe_once, spawn_status_poller, BackendStatus, DEFAULT_POLL_INTERVAL};
pub use membership::{MembershipEntry, MembershipIndex};
pub use store::{Applied, ReconcileStore, RefreshTicket};
pub use types::{FileEntry, FileId, FileStatus, Mutation, StoreId, UploadRequest};
