//! Batch operation coordinator.
//!
//! Sequences multi-file operations against the gateway and aggregates
//! partial failures. Add and delete fan out concurrently with independent
//! per-item results; uploads run strictly in order and abort the queue on
//! the first failure. A partial failure is a structured outcome, never an
//! error: callers report the success count and the failed items.

use std::sync::Arc;

use serde::Serialize;

use crate::console::Console;
use crate::types::{FileEntry, FileId, Mutation, OperationKind, PendingKey, UploadRequest};
use vectordeck_core::{AppError, AppResult};
use vectordeck_gateway::FilePurpose;

/// One item of a batch that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// File id, or filename for uploads
    pub target: String,
    pub message: String,
}

/// Aggregate result of a batch operation. Partial success is reported as
/// such, never collapsed into total success or total failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    /// Items whose remote call succeeded
    pub succeeded: u32,
    /// Items whose remote call failed (or was rejected client-side)
    pub failed: Vec<ItemFailure>,
    /// Items never attempted because an earlier sequential item failed
    pub not_attempted: Vec<String>,
}

impl BatchOutcome {
    /// Total number of items the batch covered.
    pub fn total(&self) -> usize {
        self.succeeded as usize + self.failed.len() + self.not_attempted.len()
    }

    pub fn is_full_success(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty()
    }

    /// One-line report, e.g. "1 of 2 succeeded".
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.succeeded, self.total())
    }
}

impl Console {
    /// Attach each file to the vector store.
    ///
    /// Optimistic per-item updates are applied up front; all remote calls
    /// are issued concurrently; each item's success or failure is
    /// independent. The selection is cleared once anything succeeded.
    pub async fn add_to_store(
        &mut self,
        file_ids: &[FileId],
        store_id: &str,
    ) -> AppResult<BatchOutcome> {
        let ids = Self::validated_targets(file_ids, "No files selected to add")?;
        let mut outcome = BatchOutcome::default();

        let mut in_flight = Vec::new();
        for file_id in ids {
            let mutation = Mutation::AddToStore {
                file_id: file_id.clone(),
                store_id: store_id.to_string(),
            };
            match self.store.apply_optimistic(mutation) {
                Ok(applied) => {
                    let key = PendingKey::new(&file_id, OperationKind::AddToStore);
                    let ticket = self.store.begin_operation(key);
                    in_flight.push((file_id, ticket, applied));
                }
                Err(e) => outcome.failed.push(ItemFailure {
                    target: file_id,
                    message: e.to_string(),
                }),
            }
        }

        let results = futures::future::join_all(in_flight.iter().map(|(file_id, _, _)| {
            let gateway = Arc::clone(&self.gateway);
            let store_id = store_id.to_string();
            let file_id = file_id.clone();
            async move { gateway.add_file_to_vector_store(&store_id, &file_id).await }
        }))
        .await;

        for ((file_id, ticket, applied), result) in in_flight.into_iter().zip(results) {
            let key = PendingKey::new(&file_id, OperationKind::AddToStore);
            if !self.store.finish_operation(&key, ticket) {
                // Superseded by a later request for the same key.
                continue;
            }
            match result {
                Ok(()) => {
                    self.store.confirm(applied);
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    self.store.rollback(applied);
                    self.store.mark_error(&file_id);
                    outcome.failed.push(ItemFailure {
                        target: file_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        self.after_batch(&outcome).await;
        Ok(outcome)
    }

    /// Attach the current selection to the vector store.
    pub async fn add_selection_to_store(&mut self, store_id: &str) -> AppResult<BatchOutcome> {
        let selected = self.store.selected_ids();
        self.add_to_store(&selected, store_id).await
    }

    /// Delete each file, optimistically removing it from the local list
    /// before its remote call resolves. Failed items are restored and
    /// flagged; the rest proceed independently.
    pub async fn delete_files(&mut self, file_ids: &[FileId]) -> AppResult<BatchOutcome> {
        let ids = Self::validated_targets(file_ids, "No files selected to delete")?;
        let mut outcome = BatchOutcome::default();

        let mut in_flight = Vec::new();
        for file_id in ids {
            let mutation = Mutation::DeleteFile {
                file_id: file_id.clone(),
            };
            match self.store.apply_optimistic(mutation) {
                Ok(applied) => {
                    let key = PendingKey::new(&file_id, OperationKind::DeleteFile);
                    let ticket = self.store.begin_operation(key);
                    in_flight.push((file_id, ticket, applied));
                }
                Err(e) => outcome.failed.push(ItemFailure {
                    target: file_id,
                    message: e.to_string(),
                }),
            }
        }

        let results = futures::future::join_all(in_flight.iter().map(|(file_id, _, _)| {
            let gateway = Arc::clone(&self.gateway);
            let file_id = file_id.clone();
            async move { gateway.delete_file(&file_id).await }
        }))
        .await;

        for ((file_id, ticket, applied), result) in in_flight.into_iter().zip(results) {
            let key = PendingKey::new(&file_id, OperationKind::DeleteFile);
            if !self.store.finish_operation(&key, ticket) {
                continue;
            }
            match result {
                Ok(()) => {
                    self.store.confirm(applied);
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    self.store.rollback(applied);
                    self.store.mark_error(&file_id);
                    outcome.failed.push(ItemFailure {
                        target: file_id,
                        message: e.to_string(),
                    });
                }
            }
        }

        self.after_batch(&outcome).await;
        Ok(outcome)
    }

    /// Delete the current selection.
    pub async fn delete_selection(&mut self) -> AppResult<BatchOutcome> {
        let selected = self.store.selected_ids();
        self.delete_files(&selected).await
    }

    /// Upload files one at a time, in order.
    ///
    /// The backend accepts a single multipart item per call and the caller
    /// needs one ordered progress indicator, so uploads are deliberately not
    /// parallelized. The first failure aborts the queue; the outcome lists
    /// the files that were never attempted. A file record is created only
    /// on upload confirmation.
    pub async fn upload_files(
        &mut self,
        uploads: Vec<UploadRequest>,
        purpose: FilePurpose,
    ) -> AppResult<BatchOutcome> {
        if uploads.is_empty() {
            return Err(AppError::Validation(
                "Select at least one file to upload".to_string(),
            ));
        }

        let mut names: Vec<String> = uploads.iter().map(|u| u.name.clone()).collect();
        let mut outcome = BatchOutcome::default();

        for (i, upload) in uploads.into_iter().enumerate() {
            let key = PendingKey::new(&upload.name, OperationKind::Upload);
            let ticket = self.store.begin_operation(key.clone());

            let result = self
                .gateway
                .create_file(&upload.name, upload.content, purpose)
                .await
                .and_then(FileEntry::from_upload);

            let current = self.store.finish_operation(&key, ticket);
            match result {
                Ok(entry) => {
                    if current {
                        self.store.insert_confirmed(entry);
                    }
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    tracing::warn!("Upload of '{}' failed: {}", upload.name, e);
                    outcome.failed.push(ItemFailure {
                        target: upload.name,
                        message: e.to_string(),
                    });
                    outcome.not_attempted = names.split_off(i + 1);
                    break;
                }
            }
        }

        if outcome.succeeded > 0 {
            self.store.clear_selection();
        }
        Ok(outcome)
    }

    /// Reject empty target sets before any remote call; dedup the rest,
    /// preserving order.
    fn validated_targets(file_ids: &[FileId], message: &str) -> AppResult<Vec<FileId>> {
        if file_ids.is_empty() {
            return Err(AppError::Validation(message.to_string()));
        }

        let mut ids = Vec::with_capacity(file_ids.len());
        for id in file_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        Ok(ids)
    }

    /// Post-batch bookkeeping: clear the selection once anything succeeded
    /// and re-derive the membership index. The rebuild is best-effort here;
    /// a store-list fetch failure keeps the previous index.
    async fn after_batch(&mut self, outcome: &BatchOutcome) {
        if outcome.succeeded > 0 {
            self.store.clear_selection();
        }
        if let Err(e) = self.rebuild_membership().await {
            tracing::warn!("Membership rebuild after batch failed: {}", e);
        }
    }
}
