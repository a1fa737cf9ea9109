//! Gateway contract the console core depends on.
//!
//! The backend never reports which stores contain a given file; the console
//! derives that by enumerating store members through this trait. Keeping the
//! contract minimal makes the mock provider an exact stand-in for tests.

use serde::{Deserialize, Serialize};

use crate::types::{FilePurpose, FileRecord, MemberRecord, VectorStoreRecord};
use vectordeck_core::AppResult;

/// Sort order for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Paging parameters for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    /// Maximum number of items to return
    pub limit: Option<u32>,

    /// Sort order by creation time
    pub order: Option<SortOrder>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: None,
            order: Some(SortOrder::Desc),
        }
    }
}

impl ListParams {
    /// Params with an explicit page size.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Trait for remote gateway providers.
///
/// Every method is a suspension point: callers must tolerate arbitrary delay
/// and reordering of completions relative to other in-flight calls. Failure
/// is signaled exclusively by an `Err`: an indefinitely pending call is
/// "still pending", never an implicit failure.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Get the provider name (e.g., "http", "mock").
    fn provider_name(&self) -> &str;

    /// List all uploaded files.
    async fn list_files(&self) -> AppResult<Vec<FileRecord>>;

    /// Upload one file. The backend accepts a single multipart item per call.
    async fn create_file(
        &self,
        filename: &str,
        content: Vec<u8>,
        purpose: FilePurpose,
    ) -> AppResult<FileRecord>;

    /// Delete a file by id.
    async fn delete_file(&self, file_id: &str) -> AppResult<()>;

    /// List vector stores.
    async fn list_vector_stores(&self, params: &ListParams) -> AppResult<Vec<VectorStoreRecord>>;

    /// List the files a vector store contains. A single page of at most
    /// `params.limit` members is returned; larger stores under-report.
    async fn list_vector_store_members(
        &self,
        store_id: &str,
        params: &ListParams,
    ) -> AppResult<Vec<MemberRecord>>;

    /// Attach an existing file to a vector store.
    async fn add_file_to_vector_store(&self, store_id: &str, file_id: &str) -> AppResult<()>;

    /// Probe backend reachability. Used only to decide whether to show
    /// placeholder data.
    async fn health_check(&self) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_order_desc() {
        let params = ListParams::default();
        assert_eq!(params.order, Some(SortOrder::Desc));
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_with_limit() {
        let params = ListParams::with_limit(1000);
        assert_eq!(params.limit, Some(1000));
    }
}
