//! Mock gateway provider.
//!
//! A deterministic in-memory backend used by the test suite and as an
//! offline stand-in. Individual operations can be scripted to fail so the
//! console's rollback and partial-failure paths can be exercised without a
//! network.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::client::{Gateway, ListParams};
use crate::types::{FileCounts, FilePurpose, FileRecord, MemberRecord, VectorStoreRecord};
use vectordeck_core::{AppError, AppResult};

#[derive(Default)]
struct MockState {
    files: Vec<FileRecord>,
    stores: Vec<VectorStoreRecord>,
    /// store id -> member file ids, insertion order
    members: HashMap<String, Vec<String>>,
    fail_deletes: HashSet<String>,
    fail_uploads: HashSet<String>,
    fail_scans: HashSet<String>,
    fail_attaches: HashSet<String>,
    unreachable: bool,
    scan_calls: u32,
}

impl MockState {
    fn sync_counts(&mut self, store_id: &str) {
        let total = self.members.get(store_id).map(|m| m.len()).unwrap_or(0) as u64;
        if let Some(store) = self.stores.iter_mut().find(|s| s.id == store_id) {
            store.file_counts.completed = total;
            store.file_counts.total = total;
        }
    }
}

/// In-memory gateway with scriptable failures.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an uploaded file.
    pub async fn push_file(&self, record: FileRecord) {
        self.state.lock().await.files.push(record);
    }

    /// Seed a vector store together with its members. The store's reported
    /// file counts are synced to the member list.
    pub async fn push_store(&self, store: VectorStoreRecord, member_ids: Vec<String>) {
        let mut state = self.state.lock().await;
        let store_id = store.id.clone();
        state.stores.push(store);
        state.members.insert(store_id.clone(), member_ids);
        state.sync_counts(&store_id);
    }

    /// Seed a vector store that lies about its own file count (e.g. reports
    /// zero while holding members); used to exercise the empty-store filter.
    pub async fn push_store_with_counts(
        &self,
        store: VectorStoreRecord,
        member_ids: Vec<String>,
    ) {
        let mut state = self.state.lock().await;
        state.members.insert(store.id.clone(), member_ids);
        state.stores.push(store);
    }

    /// Make `delete_file` fail for the given id.
    pub async fn fail_delete(&self, file_id: &str) {
        self.state.lock().await.fail_deletes.insert(file_id.to_string());
    }

    /// Make `create_file` fail for the given filename.
    pub async fn fail_upload(&self, filename: &str) {
        self.state.lock().await.fail_uploads.insert(filename.to_string());
    }

    /// Make member enumeration fail for the given store.
    pub async fn fail_scan(&self, store_id: &str) {
        self.state.lock().await.fail_scans.insert(store_id.to_string());
    }

    /// Make `add_file_to_vector_store` fail for the given file.
    pub async fn fail_attach(&self, file_id: &str) {
        self.state.lock().await.fail_attaches.insert(file_id.to_string());
    }

    /// Toggle backend reachability.
    pub async fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().await.unreachable = unreachable;
    }

    /// Number of member-enumeration calls served so far.
    pub async fn scan_calls(&self) -> u32 {
        self.state.lock().await.scan_calls
    }

    /// Current authoritative file list.
    pub async fn files_snapshot(&self) -> Vec<FileRecord> {
        self.state.lock().await.files.clone()
    }

    /// Current member ids of a store.
    pub async fn members_of(&self, store_id: &str) -> Vec<String> {
        self.state
            .lock()
            .await
            .members
            .get(store_id)
            .cloned()
            .unwrap_or_default()
    }

    fn reachable(state: &MockState) -> AppResult<()> {
        if state.unreachable {
            Err(AppError::Transport("mock backend unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Gateway for MockGateway {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn list_files(&self) -> AppResult<Vec<FileRecord>> {
        let state = self.state.lock().await;
        Self::reachable(&state)?;
        Ok(state.files.clone())
    }

    async fn create_file(
        &self,
        filename: &str,
        content: Vec<u8>,
        _purpose: FilePurpose,
    ) -> AppResult<FileRecord> {
        let mut state = self.state.lock().await;
        Self::reachable(&state)?;

        if state.fail_uploads.contains(filename) {
            return Err(AppError::Remote(format!(
                "400 Bad Request: upload rejected for '{}'",
                filename
            )));
        }

        let record = FileRecord {
            id: format!("file-{}", uuid::Uuid::new_v4().simple()),
            name: Some(filename.to_string()),
            filename: None,
            size_bytes: Some(content.len() as u64),
            created_at: Some(chrono::Utc::now().timestamp()),
        };
        state.files.push(record.clone());
        Ok(record)
    }

    async fn delete_file(&self, file_id: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        Self::reachable(&state)?;

        if state.fail_deletes.contains(file_id) {
            return Err(AppError::Remote(format!(
                "500 Internal Server Error: delete failed for '{}'",
                file_id
            )));
        }

        let before = state.files.len();
        state.files.retain(|f| f.id != file_id);
        if state.files.len() == before {
            return Err(AppError::Remote(format!("404 Not Found: '{}'", file_id)));
        }

        let store_ids: Vec<String> = state.members.keys().cloned().collect();
        for store_id in store_ids {
            if let Some(members) = state.members.get_mut(&store_id) {
                members.retain(|id| id != file_id);
            }
            state.sync_counts(&store_id);
        }
        Ok(())
    }

    async fn list_vector_stores(&self, params: &ListParams) -> AppResult<Vec<VectorStoreRecord>> {
        let state = self.state.lock().await;
        Self::reachable(&state)?;

        let mut stores = state.stores.clone();
        if let Some(limit) = params.limit {
            stores.truncate(limit as usize);
        }
        Ok(stores)
    }

    async fn list_vector_store_members(
        &self,
        store_id: &str,
        params: &ListParams,
    ) -> AppResult<Vec<MemberRecord>> {
        let mut state = self.state.lock().await;
        state.scan_calls += 1;
        Self::reachable(&state)?;

        if state.fail_scans.contains(store_id) {
            return Err(AppError::Remote(format!(
                "500 Internal Server Error: member listing failed for '{}'",
                store_id
            )));
        }

        let members = state
            .members
            .get(store_id)
            .ok_or_else(|| AppError::Remote(format!("404 Not Found: '{}'", store_id)))?;

        let mut ids: Vec<MemberRecord> = members
            .iter()
            .map(|id| MemberRecord { id: id.clone() })
            .collect();
        if let Some(limit) = params.limit {
            ids.truncate(limit as usize);
        }
        Ok(ids)
    }

    async fn add_file_to_vector_store(&self, store_id: &str, file_id: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        Self::reachable(&state)?;

        if state.fail_attaches.contains(file_id) {
            return Err(AppError::Remote(format!(
                "400 Bad Request: cannot attach '{}'",
                file_id
            )));
        }

        if !state.files.iter().any(|f| f.id == file_id) {
            return Err(AppError::Remote(format!("404 Not Found: '{}'", file_id)));
        }

        let members = state
            .members
            .get_mut(store_id)
            .ok_or_else(|| AppError::Remote(format!("404 Not Found: '{}'", store_id)))?;

        if !members.iter().any(|id| id == file_id) {
            members.push(file_id.to_string());
        }
        state.sync_counts(store_id);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let state = self.state.lock().await;
        Self::reachable(&state)
    }
}

/// Convenience constructor for a store record used throughout the tests.
pub fn store_record(id: &str, name: Option<&str>) -> VectorStoreRecord {
    VectorStoreRecord {
        id: id.to_string(),
        name: name.map(|n| n.to_string()),
        created_at: Some(1_700_000_000),
        file_counts: FileCounts::default(),
        usage_bytes: 0,
        metadata: HashMap::new(),
    }
}

/// Convenience constructor for a file record used throughout the tests.
pub fn file_record(id: &str, name: &str, size_bytes: u64) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        filename: None,
        size_bytes: Some(size_bytes),
        created_at: Some(1_700_000_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_list() {
        let gateway = MockGateway::new();
        let record = gateway
            .create_file("notes.txt", b"hello".to_vec(), FilePurpose::Assistants)
            .await
            .unwrap();
        assert_eq!(record.display_name(), "notes.txt");
        assert_eq!(record.size_bytes, Some(5));

        let files = gateway.list_files().await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_memberships() {
        let gateway = MockGateway::new();
        gateway.push_file(file_record("file_a", "a.txt", 10)).await;
        gateway
            .push_store(store_record("vs_1", Some("docs")), vec!["file_a".into()])
            .await;

        gateway.delete_file("file_a").await.unwrap();
        assert!(gateway.members_of("vs_1").await.is_empty());

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        assert_eq!(stores[0].file_counts.total, 0);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let gateway = MockGateway::new();
        gateway.push_file(file_record("file_a", "a.txt", 10)).await;
        gateway.fail_delete("file_a").await;

        let err = gateway.delete_file("file_a").await.unwrap_err();
        assert!(matches!(err, AppError::Remote(_)));
        assert_eq!(gateway.files_snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_everything_fails() {
        let gateway = MockGateway::new();
        gateway.set_unreachable(true).await;

        assert!(gateway.health_check().await.unwrap_err().is_transient());
        assert!(gateway.list_files().await.is_err());
    }

    #[tokio::test]
    async fn test_member_page_limit_truncates() {
        let gateway = MockGateway::new();
        let members: Vec<String> = (0..5).map(|i| format!("file_{}", i)).collect();
        gateway
            .push_store(store_record("vs_1", None), members)
            .await;

        let page = gateway
            .list_vector_store_members("vs_1", &ListParams::with_limit(3))
            .await
            .unwrap();
        assert_eq!(page.len(), 3);
    }
}
