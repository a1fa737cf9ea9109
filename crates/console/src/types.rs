//! Console type definitions.

use serde::{Deserialize, Serialize};

use crate::format::FileKind;
use vectordeck_core::{AppError, AppResult};
use vectordeck_gateway::FileRecord;

/// Opaque remote-assigned file identifier.
pub type FileId = String;

/// Opaque remote-assigned vector store identifier.
pub type StoreId = String;

/// Lifecycle status of a tracked file.
///
/// `Uploaded → Processed → {Processing ↔ Processed}`; deletion is terminal.
/// `Error` is reachable from any non-terminal state when a remote
/// confirmation fails, and recovers on a successful retry or a fresh load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Freshly uploaded, not yet confirmed by a full reload
    Uploaded,
    /// An add-to-store mutation is in flight
    Processing,
    /// Steady state
    Processed,
    /// A remote confirmation failed; retry or reload to recover
    Error,
}

/// A tracked file. Owned exclusively by the reconciliation store; created on
/// upload confirmation, removed optimistically on delete request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub size_bytes: u64,
    pub created_at: i64,
    /// Derived from the name, never stored remotely
    pub kind: FileKind,
    pub status: FileStatus,
    /// Stores this file optimistically belongs to
    pub store_ids: Vec<StoreId>,
}

impl TryFrom<FileRecord> for FileEntry {
    type Error = AppError;

    fn try_from(record: FileRecord) -> AppResult<Self> {
        record.validate()?;
        let name = record.display_name().to_string();

        Ok(FileEntry {
            kind: FileKind::from_name(&name),
            id: record.id,
            name,
            size_bytes: record.size_bytes.unwrap_or(0),
            created_at: record.created_at.unwrap_or(0),
            status: FileStatus::Processed,
            store_ids: Vec::new(),
        })
    }
}

impl FileEntry {
    /// Entry for a file the backend just confirmed as uploaded.
    pub fn from_upload(record: FileRecord) -> AppResult<Self> {
        let mut entry = FileEntry::try_from(record)?;
        entry.status = FileStatus::Uploaded;
        Ok(entry)
    }
}

/// An optimistic local state change, applied before the corresponding remote
/// call resolves and reversible if that call fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Mark a file as processing and append a store id
    AddToStore { file_id: FileId, store_id: StoreId },
    /// Remove a file from the local list
    DeleteFile { file_id: FileId },
}

impl Mutation {
    /// Id of the file this mutation targets.
    pub fn file_id(&self) -> &FileId {
        match self {
            Mutation::AddToStore { file_id, .. } => file_id,
            Mutation::DeleteFile { file_id } => file_id,
        }
    }
}

/// Kind of an in-flight operation, half of the pending-operation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    AddToStore,
    DeleteFile,
    DeleteBatch,
    Upload,
}

/// Key identifying an in-flight operation. At most one operation per key is
/// authoritative at a time; a later request supersedes the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingKey {
    /// Target file id, or filename for uploads that have no id yet
    pub target: String,
    pub kind: OperationKind,
}

impl PendingKey {
    pub fn new(target: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }
}

/// One file queued for upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub name: String,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            name: None,
            filename: Some("paper.pdf".to_string()),
            size_bytes: Some(4096),
            created_at: Some(1_700_000_000),
        }
    }

    #[test]
    fn test_entry_normalizes_record() {
        let entry = FileEntry::try_from(record("file_a")).unwrap();
        assert_eq!(entry.name, "paper.pdf");
        assert_eq!(entry.kind, FileKind::Document);
        assert_eq!(entry.status, FileStatus::Processed);
        assert!(entry.store_ids.is_empty());
    }

    #[test]
    fn test_entry_rejects_blank_id() {
        let mut bad = record("");
        bad.id = String::new();
        assert!(FileEntry::try_from(bad).is_err());
    }

    #[test]
    fn test_upload_entry_status() {
        let entry = FileEntry::from_upload(record("file_a")).unwrap();
        assert_eq!(entry.status, FileStatus::Uploaded);
    }

    #[test]
    fn test_pending_key_identity() {
        let a = PendingKey::new("file_a", OperationKind::AddToStore);
        let b = PendingKey::new("file_a", OperationKind::AddToStore);
        let c = PendingKey::new("file_a", OperationKind::DeleteFile);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
