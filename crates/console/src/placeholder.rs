//! Canned vector stores shown while the backend is unreachable.
//!
//! Read-only display data; never written back to the backend or mixed into
//! the reconciliation store.

use std::collections::HashMap;

use vectordeck_gateway::{FileCounts, VectorStoreRecord};

/// Sample stores for placeholder mode.
pub fn sample_stores() -> Vec<VectorStoreRecord> {
    let now = chrono::Utc::now().timestamp();

    vec![
        VectorStoreRecord {
            id: "vs_1234567890".to_string(),
            name: Some("Document Store".to_string()),
            created_at: Some(now - 86_400),
            file_counts: FileCounts {
                completed: 15,
                cancelled: 0,
                failed: 1,
                in_progress: 2,
                total: 18,
            },
            usage_bytes: 1_048_576,
            metadata: metadata(&[
                ("provider_id", "chroma"),
                ("provider_vector_db_id", "chroma_db_123"),
            ]),
        },
        VectorStoreRecord {
            id: "vs_0987654321".to_string(),
            name: Some("Research Papers".to_string()),
            created_at: Some(now - 172_800),
            file_counts: FileCounts {
                completed: 8,
                cancelled: 1,
                failed: 0,
                in_progress: 0,
                total: 9,
            },
            usage_bytes: 2_097_152,
            metadata: metadata(&[
                ("provider_id", "qdrant"),
                ("provider_vector_db_id", "qdrant_collection_456"),
            ]),
        },
    ]
}

fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stores_are_well_formed() {
        let stores = sample_stores();
        assert_eq!(stores.len(), 2);
        assert_ne!(stores[0].id, stores[1].id);
        for store in &stores {
            assert!(store.file_counts.total > 0);
            assert!(store.metadata.contains_key("provider_id"));
        }
    }
}
