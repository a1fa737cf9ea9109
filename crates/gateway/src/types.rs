//! Wire types for the remote gateway.
//!
//! The backend's JSON is loose: list responses are sometimes a bare array and
//! sometimes a `{object: "list", data: [...]}` envelope, file names arrive as
//! either `name` or `filename`, sizes as either `size_bytes` or `bytes`.
//! Everything is captured explicitly here and normalized before any record
//! crosses into the console core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use vectordeck_core::{AppError, AppResult};

/// Purpose attached to a file at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilePurpose {
    #[serde(rename = "assistants")]
    Assistants,
    #[serde(rename = "responses")]
    Responses,
    #[serde(rename = "fine-tune")]
    FineTune,
    #[serde(rename = "batch")]
    Batch,
}

impl FilePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilePurpose::Assistants => "assistants",
            FilePurpose::Responses => "responses",
            FilePurpose::FineTune => "fine-tune",
            FilePurpose::Batch => "batch",
        }
    }
}

impl fmt::Display for FilePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilePurpose {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "assistants" => Ok(FilePurpose::Assistants),
            "responses" => Ok(FilePurpose::Responses),
            "fine-tune" => Ok(FilePurpose::FineTune),
            "batch" => Ok(FilePurpose::Batch),
            other => Err(AppError::Validation(format!(
                "Unknown purpose '{}'. Supported: assistants, responses, fine-tune, batch",
                other
            ))),
        }
    }
}

/// An uploaded file as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Remote-assigned opaque identifier
    pub id: String,

    /// Display name; some backends report `filename` instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Alternate name field used by OpenAI-style backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Size in bytes; some backends report `bytes` instead
    #[serde(default, alias = "bytes", skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,

    /// Creation time in seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

impl FileRecord {
    /// Best display name for this record: `name`, then `filename`, then id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.filename.as_deref())
            .unwrap_or(&self.id)
    }

    /// Validate the record at the boundary. The id is the only field the
    /// console cannot synthesize.
    pub fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Validation(
                "File record is missing an id".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregate per-state file counts a vector store reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub in_progress: u64,
    #[serde(default)]
    pub total: u64,
}

/// A vector store as reported by the backend. Read-only from the console's
/// perspective: only its membership is ever mutated, never the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreRecord {
    /// Remote-assigned opaque identifier
    pub id: String,

    /// Optional human name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Creation time in seconds since the epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Aggregate file counts by processing state
    #[serde(default)]
    pub file_counts: FileCounts,

    /// Usage in bytes
    #[serde(default)]
    pub usage_bytes: u64,

    /// Free-form provider metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorStoreRecord {
    /// Display name: the human name when present, otherwise the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A single member of a vector store, as returned by the membership listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Id of the file the store contains
    pub id: String,
}

/// List responses arrive either wrapped (`{object: "list", data: [...]}`)
/// or as a bare array. Both shapes normalize to a plain `Vec`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { data } => data,
            ListEnvelope::Bare(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_round_trip() {
        for purpose in [
            FilePurpose::Assistants,
            FilePurpose::Responses,
            FilePurpose::FineTune,
            FilePurpose::Batch,
        ] {
            let json = serde_json::to_string(&purpose).unwrap();
            let back: FilePurpose = serde_json::from_str(&json).unwrap();
            assert_eq!(back, purpose);
            assert_eq!(purpose.as_str().parse::<FilePurpose>().unwrap(), purpose);
        }
    }

    #[test]
    fn test_purpose_rejects_unknown() {
        assert!("embeddings".parse::<FilePurpose>().is_err());
    }

    #[test]
    fn test_file_record_name_fallbacks() {
        let record: FileRecord =
            serde_json::from_str(r#"{"id": "file-1", "filename": "notes.txt"}"#).unwrap();
        assert_eq!(record.display_name(), "notes.txt");

        let bare: FileRecord = serde_json::from_str(r#"{"id": "file-2"}"#).unwrap();
        assert_eq!(bare.display_name(), "file-2");
    }

    #[test]
    fn test_file_record_bytes_alias() {
        let record: FileRecord =
            serde_json::from_str(r#"{"id": "file-1", "bytes": 2048}"#).unwrap();
        assert_eq!(record.size_bytes, Some(2048));
    }

    #[test]
    fn test_file_record_missing_id_rejected() {
        let record: FileRecord = serde_json::from_str(r#"{"id": "  "}"#).unwrap();
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_envelope_wrapped_and_bare() {
        let wrapped: ListEnvelope<FileRecord> =
            serde_json::from_str(r#"{"object": "list", "data": [{"id": "file-1"}]}"#).unwrap();
        assert_eq!(wrapped.into_items().len(), 1);

        let bare: ListEnvelope<FileRecord> =
            serde_json::from_str(r#"[{"id": "file-1"}, {"id": "file-2"}]"#).unwrap();
        assert_eq!(bare.into_items().len(), 2);
    }

    #[test]
    fn test_store_defaults_for_sparse_payload() {
        let store: VectorStoreRecord = serde_json::from_str(r#"{"id": "vs_1"}"#).unwrap();
        assert_eq!(store.file_counts.total, 0);
        assert_eq!(store.usage_bytes, 0);
        assert!(store.metadata.is_empty());
        assert_eq!(store.display_name(), "vs_1");
    }
}
