//! HTTP gateway provider.
//!
//! Talks to an OpenAI-compatible files + vector-stores backend (e.g. a
//! Llama Stack distribution) under its `/v1` prefix.

use std::time::Duration;

use crate::client::{Gateway, ListParams};
use crate::types::{FilePurpose, FileRecord, ListEnvelope, MemberRecord, VectorStoreRecord};
use vectordeck_core::{AppError, AppResult};

/// HTTP gateway backed by reqwest.
pub struct HttpGateway {
    /// Base URL of the backend, without the `/v1` prefix
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway with default settings.
    ///
    /// Default URL: http://localhost:8321
    pub fn new() -> Self {
        Self::with_base_url("http://localhost:8321")
    }

    /// Create a gateway with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a gateway with a custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn paging(params: &ListParams) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(order) = params.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }

    /// Map a completed response to success or a remote rejection.
    async fn check_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(AppError::Remote(format!("{}: {}", status, body)))
    }

    fn transport(err: reqwest::Error) -> AppError {
        AppError::Transport(err.to_string())
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Gateway for HttpGateway {
    fn provider_name(&self) -> &str {
        "http"
    }

    async fn list_files(&self) -> AppResult<Vec<FileRecord>> {
        tracing::debug!("Listing files from {}", self.base_url);

        let response = self
            .client
            .get(self.url("files"))
            .send()
            .await
            .map_err(Self::transport)?;

        let envelope: ListEnvelope<FileRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse file list: {}", e)))?;

        Ok(envelope.into_items())
    }

    async fn create_file(
        &self,
        filename: &str,
        content: Vec<u8>,
        purpose: FilePurpose,
    ) -> AppResult<FileRecord> {
        tracing::debug!("Uploading '{}' with purpose {}", filename, purpose);

        let part = reqwest::multipart::Part::bytes(content).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("purpose", purpose.as_str());

        let response = self
            .client
            .post(self.url("files"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport)?;

        let record: FileRecord = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse file record: {}", e)))?;

        record.validate()?;
        Ok(record)
    }

    async fn delete_file(&self, file_id: &str) -> AppResult<()> {
        tracing::debug!("Deleting file {}", file_id);

        let response = self
            .client
            .delete(self.url(&format!("files/{}", file_id)))
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn list_vector_stores(&self, params: &ListParams) -> AppResult<Vec<VectorStoreRecord>> {
        tracing::debug!("Listing vector stores from {}", self.base_url);

        let response = self
            .client
            .get(self.url("vector_stores"))
            .query(&Self::paging(params))
            .send()
            .await
            .map_err(Self::transport)?;

        let envelope: ListEnvelope<VectorStoreRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| {
                AppError::Serialization(format!("Failed to parse vector store list: {}", e))
            })?;

        Ok(envelope.into_items())
    }

    async fn list_vector_store_members(
        &self,
        store_id: &str,
        params: &ListParams,
    ) -> AppResult<Vec<MemberRecord>> {
        tracing::debug!("Listing members of vector store {}", store_id);

        let response = self
            .client
            .get(self.url(&format!("vector_stores/{}/files", store_id)))
            .query(&Self::paging(params))
            .send()
            .await
            .map_err(Self::transport)?;

        let envelope: ListEnvelope<MemberRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse member list: {}", e)))?;

        Ok(envelope.into_items())
    }

    async fn add_file_to_vector_store(&self, store_id: &str, file_id: &str) -> AppResult<()> {
        tracing::debug!("Attaching file {} to vector store {}", file_id, store_id);

        let response = self
            .client
            .post(self.url(&format!("vector_stores/{}/files", store_id)))
            .json(&serde_json::json!({ "file_id": file_id }))
            .send()
            .await
            .map_err(Self::transport)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        let response = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .map_err(Self::transport)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Transport(format!(
                "Health probe returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SortOrder;

    #[test]
    fn test_gateway_creation() {
        let gateway = HttpGateway::new();
        assert_eq!(gateway.provider_name(), "http");
        assert_eq!(gateway.base_url, "http://localhost:8321");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let gateway = HttpGateway::with_base_url("http://stack:9000/");
        assert_eq!(gateway.url("files"), "http://stack:9000/v1/files");
    }

    #[test]
    fn test_paging_query() {
        let params = ListParams {
            limit: Some(20),
            order: Some(SortOrder::Desc),
        };
        let query = HttpGateway::paging(&params);
        assert_eq!(query.len(), 2);
        assert_eq!(query[0], ("limit", "20".to_string()));
        assert_eq!(query[1], ("order", "desc".to_string()));
    }
}
