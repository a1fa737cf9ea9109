//! Console facade.
//!
//! Owns the reconciliation store and the gateway handle, and drives the
//! load → reconcile → rebuild cycle. The presentation layer reads state
//! through the accessors here and issues intents through the batch
//! operations in [`crate::batch`].

use std::sync::Arc;

use crate::membership;
use crate::store::ReconcileStore;
use crate::types::{FileEntry, FileId, StoreId};
use vectordeck_core::{AppConfig, AppResult};
use vectordeck_gateway::{Gateway, ListParams, VectorStoreRecord};

/// Default page size when enumerating a store's members.
pub const DEFAULT_MEMBER_PAGE_LIMIT: u32 = 1000;

/// The management console core: gateway + reconciliation store + the
/// vector-store catalog last fetched from the backend.
pub struct Console {
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) store: ReconcileStore,
    pub(crate) catalog: Vec<VectorStoreRecord>,
    pub(crate) list_params: ListParams,
    pub(crate) member_page_limit: u32,
}

impl Console {
    /// Console with default paging limits.
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            store: ReconcileStore::new(),
            catalog: Vec::new(),
            list_params: ListParams::default(),
            member_page_limit: DEFAULT_MEMBER_PAGE_LIMIT,
        }
    }

    /// Console with paging limits taken from configuration.
    pub fn from_config(gateway: Arc<dyn Gateway>, config: &AppConfig) -> Self {
        Self {
            list_params: ListParams::with_limit(config.list_limit),
            member_page_limit: config.member_page_limit,
            ..Self::new(gateway)
        }
    }

    /// Load the authoritative file list and rebuild the membership index.
    ///
    /// The file list is a full replacement: optimistic records the backend
    /// does not confirm are discarded. A refresh superseded by a newer one
    /// discards its own results instead of committing them. On a fetch
    /// failure the error propagates and the previous state stays in place.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let ticket = self.store.begin_refresh();

        let records = self.gateway.list_files().await?;
        let entries: Vec<FileEntry> = records
            .into_iter()
            .filter_map(|record| match FileEntry::try_from(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Dropping malformed file record: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Loaded {} files from backend", entries.len());

        if !self.store.commit_files(&ticket, entries) {
            return Ok(());
        }

        let stores = self.gateway.list_vector_stores(&self.list_params).await?;
        let index = membership::rebuild(
            &*self.gateway,
            &self.store.file_ids(),
            &stores,
            self.member_page_limit,
            ticket.cancel_token(),
        )
        .await;

        if self.store.ticket_current(&ticket) {
            self.catalog = stores;
        }
        self.store.commit_rebuild(&ticket, index);
        Ok(())
    }

    /// Re-derive the membership index for the current file set.
    ///
    /// Fails only when the store-list fetch fails, in which case the index
    /// keeps its previous value and the error propagates. Per-store scan
    /// failures are absorbed inside the rebuild.
    pub async fn rebuild_membership(&mut self) -> AppResult<()> {
        let ticket = self.store.begin_refresh();

        let stores = self.gateway.list_vector_stores(&self.list_params).await?;
        let index = membership::rebuild(
            &*self.gateway,
            &self.store.file_ids(),
            &stores,
            self.member_page_limit,
            ticket.cancel_token(),
        )
        .await;

        if self.store.ticket_current(&ticket) {
            self.catalog = stores;
        }
        self.store.commit_rebuild(&ticket, index);
        Ok(())
    }

    // ---- projections -------------------------------------------------------

    pub fn files(&self) -> &[FileEntry] {
        self.store.files()
    }

    pub fn file(&self, file_id: &str) -> Option<&FileEntry> {
        self.store.file(file_id)
    }

    /// Vector stores as of the last successful fetch.
    pub fn vector_stores(&self) -> &[VectorStoreRecord] {
        &self.catalog
    }

    /// Stores containing the file: scanned index plus optimistic additions.
    pub fn store_ids_for(&self, file_id: &str) -> Vec<StoreId> {
        self.store.effective_stores(file_id)
    }

    pub fn membership_count(&self, file_id: &str) -> usize {
        self.store.membership_count(file_id)
    }

    /// Read-only view of the reconciliation store.
    pub fn state(&self) -> &ReconcileStore {
        &self.store
    }

    // ---- selection ---------------------------------------------------------

    pub fn select(&mut self, file_id: &str) -> AppResult<()> {
        self.store.select(file_id)
    }

    pub fn deselect(&mut self, file_id: &str) {
        self.store.deselect(file_id)
    }

    pub fn selected_ids(&self) -> Vec<FileId> {
        self.store.selected_ids()
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection()
    }
}
