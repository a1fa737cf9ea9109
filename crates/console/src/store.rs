//! Reconciliation store.
//!
//! The single mutable source of truth for the console: the tracked file
//! list, the selection, the derived membership index, and the bookkeeping
//! for in-flight operations. All readers are projections of this state;
//! nothing else in the workspace mutates it.

use std::collections::{BTreeSet, HashMap, HashSet};

use tokio_util::sync::CancellationToken;

use crate::membership::MembershipIndex;
use crate::types::{FileEntry, FileId, FileStatus, Mutation, PendingKey, StoreId};
use vectordeck_core::{AppError, AppResult};

/// Guard for one load/rebuild cycle.
///
/// Beginning a new refresh cancels the previous ticket's token and bumps the
/// epoch, so a slow, superseded cycle can neither keep scanning nor commit
/// its stale result over a fresher one.
#[derive(Debug)]
pub struct RefreshTicket {
    epoch: u64,
    cancel: CancellationToken,
}

impl RefreshTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Receipt for an applied optimistic mutation. Holds the exact pre-mutation
/// snapshot (record plus position) needed for an exact rollback.
#[derive(Debug, Clone)]
pub struct Applied {
    mutation: Mutation,
    snapshot: Option<(usize, FileEntry)>,
}

impl Applied {
    pub fn mutation(&self) -> &Mutation {
        &self.mutation
    }
}

/// The authoritative-as-known local view.
#[derive(Debug, Default)]
pub struct ReconcileStore {
    files: Vec<FileEntry>,
    selection: BTreeSet<FileId>,
    membership: MembershipIndex,
    pending: HashMap<PendingKey, u64>,
    next_op_ticket: u64,
    epoch: u64,
    refresh_cancel: CancellationToken,
}

impl ReconcileStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- refresh lifecycle -------------------------------------------------

    /// Start a load/rebuild cycle, superseding any cycle still in flight.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.refresh_cancel.cancel();
        self.refresh_cancel = CancellationToken::new();
        self.epoch += 1;

        RefreshTicket {
            epoch: self.epoch,
            cancel: self.refresh_cancel.clone(),
        }
    }

    /// Whether the ticket still belongs to the newest refresh.
    pub fn ticket_current(&self, ticket: &RefreshTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Replace the file list wholesale from an authoritative response.
    ///
    /// Full replacement, not a merge: any optimistic record the response
    /// does not confirm is discarded. The selection and the membership
    /// index are invalidated along with the file set. Returns false (and
    /// changes nothing) when the ticket has been superseded.
    pub fn commit_files(&mut self, ticket: &RefreshTicket, entries: Vec<FileEntry>) -> bool {
        if !self.ticket_current(ticket) {
            tracing::debug!("Discarding stale file list (epoch {})", ticket.epoch);
            return false;
        }

        self.files = entries;
        self.selection.clear();
        self.membership = MembershipIndex::new();
        true
    }

    /// Install a freshly built membership index. Returns false (and keeps
    /// the current index) when the ticket has been superseded: stale
    /// results are discarded, never merged.
    pub fn commit_rebuild(&mut self, ticket: &RefreshTicket, index: MembershipIndex) -> bool {
        if !self.ticket_current(ticket) {
            tracing::debug!("Discarding stale membership index (epoch {})", ticket.epoch);
            return false;
        }

        self.membership = index;
        true
    }

    // ---- files -------------------------------------------------------------

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn file(&self, file_id: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn file_ids(&self) -> HashSet<FileId> {
        self.files.iter().map(|f| f.id.clone()).collect()
    }

    /// Insert a server-confirmed record (upload confirmation). Replaces any
    /// existing entry with the same id.
    pub fn insert_confirmed(&mut self, entry: FileEntry) {
        match self.files.iter_mut().find(|f| f.id == entry.id) {
            Some(slot) => *slot = entry,
            None => self.files.push(entry),
        }
    }

    pub fn membership(&self) -> &MembershipIndex {
        &self.membership
    }

    /// Stores containing the file: the scanned index merged with the file's
    /// optimistic memberships, deduplicated, index order first.
    pub fn effective_stores(&self, file_id: &str) -> Vec<StoreId> {
        let mut stores: Vec<StoreId> = self.membership.stores_for(file_id).to_vec();
        if let Some(entry) = self.file(file_id) {
            for store_id in &entry.store_ids {
                if !stores.contains(store_id) {
                    stores.push(store_id.clone());
                }
            }
        }
        stores
    }

    pub fn membership_count(&self, file_id: &str) -> usize {
        self.effective_stores(file_id).len()
    }

    // ---- optimistic mutations ----------------------------------------------

    /// Apply a mutation locally, before its remote call resolves, so readers
    /// see the intent immediately. Returns a receipt carrying the exact
    /// pre-mutation snapshot.
    pub fn apply_optimistic(&mut self, mutation: Mutation) -> AppResult<Applied> {
        match &mutation {
            Mutation::AddToStore { file_id, store_id } => {
                let idx = self.position(file_id)?;
                let snapshot = (idx, self.files[idx].clone());

                let entry = &mut self.files[idx];
                entry.status = FileStatus::Processing;
                if !entry.store_ids.contains(store_id) {
                    entry.store_ids.push(store_id.clone());
                }

                Ok(Applied {
                    mutation,
                    snapshot: Some(snapshot),
                })
            }
            Mutation::DeleteFile { file_id } => {
                let idx = self.position(file_id)?;
                let entry = self.files.remove(idx);

                Ok(Applied {
                    mutation,
                    snapshot: Some((idx, entry)),
                })
            }
        }
    }

    /// Keep the optimistic state after remote success, finalizing any
    /// transitional status.
    pub fn confirm(&mut self, applied: Applied) {
        if let Mutation::AddToStore { file_id, .. } = applied.mutation() {
            if let Some(entry) = self.files.iter_mut().find(|f| &f.id == file_id) {
                entry.status = FileStatus::Processed;
            }
        }
        // DeleteFile: the record is already gone; nothing to finalize.
    }

    /// Restore the exact pre-mutation snapshot after remote failure.
    /// Atomic with respect to the file record: the snapshot replaces the
    /// optimistic state entirely, never a mix of the two.
    pub fn rollback(&mut self, applied: Applied) {
        let Applied { mutation, snapshot } = applied;
        let Some((idx, entry)) = snapshot else {
            return;
        };

        match mutation {
            Mutation::AddToStore { file_id, .. } => {
                match self.files.iter_mut().find(|f| f.id == file_id) {
                    Some(slot) => *slot = entry,
                    // Deleted concurrently; restore at the remembered spot.
                    None => self.files.insert(idx.min(self.files.len()), entry),
                }
            }
            Mutation::DeleteFile { .. } => {
                self.files.insert(idx.min(self.files.len()), entry);
            }
        }
    }

    /// Transition a file to the error state after a failed remote
    /// confirmation. Recoverable by a successful retry of the same
    /// operation or a fresh load.
    pub fn mark_error(&mut self, file_id: &str) -> bool {
        match self.files.iter_mut().find(|f| f.id == file_id) {
            Some(entry) => {
                entry.status = FileStatus::Error;
                true
            }
            None => false,
        }
    }

    fn position(&self, file_id: &str) -> AppResult<usize> {
        self.files
            .iter()
            .position(|f| f.id == file_id)
            .ok_or_else(|| AppError::Validation(format!("Unknown file '{}'", file_id)))
    }

    // ---- selection ---------------------------------------------------------

    pub fn select(&mut self, file_id: &str) -> AppResult<()> {
        self.position(file_id)?;
        self.selection.insert(file_id.to_string());
        Ok(())
    }

    pub fn deselect(&mut self, file_id: &str) {
        self.selection.remove(file_id);
    }

    pub fn selection(&self) -> &BTreeSet<FileId> {
        &self.selection
    }

    pub fn selected_ids(&self) -> Vec<FileId> {
        self.selection.iter().cloned().collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- pending operations ------------------------------------------------

    /// Register an in-flight operation for a key, superseding any earlier
    /// operation for the same key. Returns the ticket the caller must
    /// present when the operation resolves.
    pub fn begin_operation(&mut self, key: PendingKey) -> u64 {
        self.next_op_ticket += 1;
        self.pending.insert(key, self.next_op_ticket);
        self.next_op_ticket
    }

    /// Whether the ticket is still the authoritative operation for its key.
    /// A superseded operation's resolution must be discarded, not merged.
    pub fn operation_current(&self, key: &PendingKey, ticket: u64) -> bool {
        self.pending.get(key) == Some(&ticket)
    }

    /// Resolve an operation. Returns true (and clears the key) when the
    /// ticket was still authoritative; false when it had been superseded.
    pub fn finish_operation(&mut self, key: &PendingKey, ticket: u64) -> bool {
        if self.operation_current(key, ticket) {
            self.pending.remove(key);
            true
        } else {
            false
        }
    }
}
