//! Membership index builder.
//!
//! The backend has no "which stores contain file X" endpoint, so the console
//! derives a reverse index by enumerating the members of every vector store
//! and cross-referencing them against the tracked file set.

use std::collections::{HashMap, HashSet};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::types::{FileId, StoreId};
use vectordeck_gateway::{Gateway, ListParams, VectorStoreRecord};

/// Membership of a single file: how many stores contain it, and which.
///
/// The only mutation point is [`MembershipEntry::record`], which keeps the
/// count equal to the store list length and the list free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipEntry {
    count: u32,
    stores: Vec<StoreId>,
}

impl MembershipEntry {
    fn record(&mut self, store_id: StoreId) {
        if self.stores.contains(&store_id) {
            return;
        }
        self.stores.push(store_id);
        self.count += 1;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn stores(&self) -> &[StoreId] {
        &self.stores
    }
}

/// Derived reverse mapping from file id to the stores containing it.
///
/// This is a cache, never authoritative storage: it reflects only the stores
/// actually enumerated during its rebuild, and is thrown away wholesale
/// whenever the file set or any membership changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    entries: HashMap<FileId, MembershipEntry>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note that `store_id` contains `file_id`. Commutative: merging scan
    /// results in any completion order produces the same counts.
    pub fn record(&mut self, file_id: FileId, store_id: StoreId) {
        self.entries.entry(file_id).or_default().record(store_id);
    }

    /// Number of stores known to contain the file. Zero for unknown files.
    pub fn count_for(&self, file_id: &str) -> u32 {
        self.entries.get(file_id).map(|e| e.count()).unwrap_or(0)
    }

    /// Stores known to contain the file, in scan completion order.
    pub fn stores_for(&self, file_id: &str) -> &[StoreId] {
        self.entries
            .get(file_id)
            .map(|e| e.stores())
            .unwrap_or(&[])
    }

    pub fn entry(&self, file_id: &str) -> Option<&MembershipEntry> {
        self.entries.get(file_id)
    }

    /// Number of files with at least one known membership.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rebuild the membership index for `file_ids` by scanning `stores`.
///
/// Stores reporting a total file count of zero are skipped. This is a
/// performance filter, not a correctness guarantee: a store populated after its record
/// was fetched is missed until the next rebuild. Each surviving store is
/// enumerated with a single page of at most `page_limit` members, so larger
/// stores under-report; this is an accepted limitation.
///
/// Scans run concurrently and merge in completion order. A scan that fails
/// is absorbed: that store contributes zero memberships and every other
/// store's result is reflected exactly. The cancellation token short-cuts
/// the scans of a superseded rebuild; the caller discards the result via its
/// staleness check before any state is mutated.
pub async fn rebuild(
    gateway: &dyn Gateway,
    file_ids: &HashSet<FileId>,
    stores: &[VectorStoreRecord],
    page_limit: u32,
    cancel: &CancellationToken,
) -> MembershipIndex {
    let params = ListParams::with_limit(page_limit);

    let mut scans: FuturesUnordered<_> = stores
        .iter()
        .filter(|store| store.file_counts.total > 0)
        .map(|store| {
            let store_id = store.id.clone();
            let params = params;
            async move {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("Scan of {} abandoned: rebuild superseded", store_id);
                        (store_id, Vec::new())
                    }
                    result = gateway.list_vector_store_members(&store_id, &params) => {
                        match result {
                            Ok(members) => (store_id, members),
                            Err(e) => {
                                tracing::warn!("Skipping store {}: {}", store_id, e);
                                (store_id, Vec::new())
                            }
                        }
                    }
                }
            }
        })
        .collect();

    let mut index = MembershipIndex::new();
    while let Some((store_id, members)) = scans.next().await {
        for member in members {
            if file_ids.contains(&member.id) {
                index.record(member.id, store_id.clone());
            }
        }
    }

    tracing::debug!(
        "Membership rebuild complete: {} of {} files have known memberships",
        index.len(),
        file_ids.len()
    );

    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectordeck_gateway::providers::mock::{file_record, store_record, MockGateway};

    fn id_set(ids: &[&str]) -> HashSet<FileId> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn test_entry_dedups_and_counts() {
        let mut entry = MembershipEntry::default();
        entry.record("vs_1".to_string());
        entry.record("vs_2".to_string());
        entry.record("vs_1".to_string());

        assert_eq!(entry.count(), 2);
        assert_eq!(entry.count() as usize, entry.stores().len());
    }

    #[test]
    fn test_index_counts_unknown_file_zero() {
        let index = MembershipIndex::new();
        assert_eq!(index.count_for("file_x"), 0);
        assert!(index.stores_for("file_x").is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_counts_every_containing_store() {
        let gateway = MockGateway::new();
        for id in ["file_a", "file_b", "file_c"] {
            gateway.push_file(file_record(id, "f.txt", 1)).await;
        }
        gateway
            .push_store(
                store_record("vs_1", None),
                vec!["file_a".into(), "file_b".into()],
            )
            .await;
        gateway
            .push_store(
                store_record("vs_2", None),
                vec!["file_a".into(), "file_c".into(), "other".into()],
            )
            .await;

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        let index = rebuild(
            &gateway,
            &id_set(&["file_a", "file_b", "file_c"]),
            &stores,
            1000,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(index.count_for("file_a"), 2);
        assert_eq!(index.count_for("file_b"), 1);
        assert_eq!(index.count_for("file_c"), 1);
        // "other" is not in the tracked file set
        assert_eq!(index.count_for("other"), 0);

        let mut stores_a = index.stores_for("file_a").to_vec();
        stores_a.sort();
        assert_eq!(stores_a, vec!["vs_1".to_string(), "vs_2".to_string()]);
    }

    #[tokio::test]
    async fn test_rebuild_single_member_scenario() {
        let gateway = MockGateway::new();
        gateway.push_file(file_record("file_A", "a.txt", 1)).await;
        gateway
            .push_store(
                store_record("vs_X", None),
                vec!["file_A".into(), "m2".into(), "m3".into()],
            )
            .await;

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        let index = rebuild(
            &gateway,
            &id_set(&["file_A"]),
            &stores,
            1000,
            &CancellationToken::new(),
        )
        .await;

        assert_eq!(index.count_for("file_A"), 1);
        assert_eq!(index.stores_for("file_A"), ["vs_X".to_string()]);
    }

    #[tokio::test]
    async fn test_rebuild_absorbs_single_scan_failure() {
        let gateway = MockGateway::new();
        gateway.push_file(file_record("file_a", "a.txt", 1)).await;
        gateway
            .push_store(store_record("vs_ok", None), vec!["file_a".into()])
            .await;
        gateway
            .push_store(store_record("vs_bad", None), vec!["file_a".into()])
            .await;
        gateway.fail_scan("vs_bad").await;

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        let index = rebuild(
            &gateway,
            &id_set(&["file_a"]),
            &stores,
            1000,
            &CancellationToken::new(),
        )
        .await;

        // The failed store contributes nothing; the healthy one is exact.
        assert_eq!(index.count_for("file_a"), 1);
        assert_eq!(index.stores_for("file_a"), ["vs_ok".to_string()]);
    }

    #[tokio::test]
    async fn test_rebuild_skips_stores_reporting_empty() {
        let gateway = MockGateway::new();
        gateway.push_file(file_record("file_a", "a.txt", 1)).await;
        // Lies about being empty: holds a member but reports total == 0.
        gateway
            .push_store_with_counts(store_record("vs_empty", None), vec!["file_a".into()])
            .await;

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        let index = rebuild(
            &gateway,
            &id_set(&["file_a"]),
            &stores,
            1000,
            &CancellationToken::new(),
        )
        .await;

        // Filter skipped the store entirely: no scan call, no membership.
        assert_eq!(gateway.scan_calls().await, 0);
        assert_eq!(index.count_for("file_a"), 0);
    }

    #[tokio::test]
    async fn test_rebuild_respects_page_limit() {
        let gateway = MockGateway::new();
        let members: Vec<String> = (0..10).map(|i| format!("file_{}", i)).collect();
        for id in &members {
            gateway.push_file(file_record(id, "f.txt", 1)).await;
        }
        gateway
            .push_store(store_record("vs_big", None), members.clone())
            .await;

        let stores = gateway
            .list_vector_stores(&ListParams::default())
            .await
            .unwrap();
        let file_ids: HashSet<FileId> = members.iter().cloned().collect();
        let index = rebuild(&gateway, &file_ids, &stores, 4, &CancellationToken::new()).await;

        // Only the single fetched page is reflected; the store under-reports.
        assert_eq!(index.len(), 4);
    }
}
